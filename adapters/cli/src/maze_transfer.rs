use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use maze_drive_core::{FinishArea, MazeParameters};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const TRANSFER_DOMAIN: &str = "maze";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the maze dimensions and payload.
pub(crate) const TRANSFER_HEADER: &str = "maze:v1";
const FIELD_DELIMITER: char = ':';

/// Encodes maze parameters into a single-line `maze:v1:<W>x<H>:<payload>`
/// string, with the dimensions measured in chunks.
pub(crate) fn encode(parameters: &MazeParameters) -> Result<String, TransferError> {
    let payload = TransferPayload {
        seed: parameters.seed,
        chunk_size: parameters.chunk_size,
        finish: parameters.finish,
    };
    let json = serde_json::to_vec(&payload).map_err(TransferError::InvalidPayload)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!(
        "{TRANSFER_HEADER}:{}x{}:{encoded}",
        parameters.width, parameters.height
    ))
}

/// Decodes maze parameters from a transfer string.
///
/// The parameters are returned verbatim; validating them is left to
/// generation.
pub(crate) fn decode(value: &str) -> Result<MazeParameters, TransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TransferError::Empty);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(TransferError::MissingPrefix)?;
    let version = parts.next().ok_or(TransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(TransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(TransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(TransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(TransferError::UnsupportedVersion(version.to_owned()));
    }

    let (width, height) = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(TransferError::InvalidEncoding)?;
    let decoded: TransferPayload =
        serde_json::from_slice(&bytes).map_err(TransferError::InvalidPayload)?;

    Ok(MazeParameters {
        seed: decoded.seed,
        chunk_size: decoded.chunk_size,
        width,
        height,
        finish: decoded.finish,
    })
}

#[derive(Serialize, Deserialize)]
struct TransferPayload {
    seed: i64,
    chunk_size: i32,
    #[serde(default)]
    finish: FinishArea,
}

/// Failures while decoding a maze transfer string.
#[derive(Debug, Error)]
pub(crate) enum TransferError {
    #[error("maze string is empty")]
    Empty,
    #[error("maze string is missing the prefix")]
    MissingPrefix,
    #[error("maze string is missing the version")]
    MissingVersion,
    #[error("maze string is missing the dimensions")]
    MissingDimensions,
    #[error("maze string is missing the payload")]
    MissingPayload,
    #[error("maze prefix '{0}' is not supported")]
    InvalidPrefix(String),
    #[error("maze string version '{0}' is not supported")]
    UnsupportedVersion(String),
    #[error("could not parse maze dimensions '{0}'")]
    InvalidDimensions(String),
    #[error("could not decode maze payload")]
    InvalidEncoding(#[source] base64::DecodeError),
    #[error("could not process maze payload")]
    InvalidPayload(#[source] serde_json::Error),
}

fn parse_dimensions(dimensions: &str) -> Result<(i32, i32), TransferError> {
    let invalid = || TransferError::InvalidDimensions(dimensions.to_owned());
    let (width, height) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let width = width.trim().parse::<i32>().map_err(|_| invalid())?;
    let height = height.trim().parse::<i32>().map_err(|_| invalid())?;
    if width <= 0 || height <= 0 {
        return Err(invalid());
    }

    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use maze_drive_core::GlobalCell;

    use super::*;

    fn parameters(finish: FinishArea) -> MazeParameters {
        MazeParameters {
            seed: -42,
            chunk_size: 6,
            width: 4,
            height: 3,
            finish,
        }
    }

    #[test]
    fn round_trips_parameters() {
        let original = parameters(FinishArea::Center);
        let encoded = encode(&original).expect("encodes");
        assert!(encoded.starts_with(&format!("{TRANSFER_HEADER}:4x3:")));

        assert_eq!(decode(&encoded).expect("decodes"), original);
    }

    #[test]
    fn round_trips_explicit_finish_anchor() {
        let original = parameters(FinishArea::At {
            anchor: GlobalCell::new(2, 5),
        });
        let encoded = encode(&original).expect("encodes");

        assert_eq!(decode(&format!("  {encoded}\n")).expect("decodes"), original);
    }

    #[test]
    fn rejects_malformed_strings() {
        assert!(matches!(decode("   "), Err(TransferError::Empty)));
        assert!(matches!(decode("maze"), Err(TransferError::MissingVersion)));
        assert!(matches!(
            decode("maze:v1:4x3"),
            Err(TransferError::MissingPayload)
        ));
        assert!(matches!(
            decode("tower:v1:4x3:e30"),
            Err(TransferError::InvalidPrefix(prefix)) if prefix == "tower"
        ));
        assert!(matches!(
            decode("maze:v9:4x3:e30"),
            Err(TransferError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            decode("maze:v1:0x3:e30"),
            Err(TransferError::InvalidDimensions(_))
        ));
        assert!(matches!(
            decode("maze:v1:4x3:!!"),
            Err(TransferError::InvalidEncoding(_))
        ));
        assert!(matches!(
            decode("maze:v1:4x3:e30"),
            Err(TransferError::InvalidPayload(_))
        ));
    }
}
