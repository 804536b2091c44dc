use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::error::AppResult;

const TRANSPORT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decodes a provider payload. Gmail sends URL-safe base64 without a fixed
/// padding policy; standard-alphabet input and folded lines are accepted too.
pub fn decode_transport(data: &str) -> AppResult<Vec<u8>> {
    let normalized: String = data
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    Ok(TRANSPORT.decode(normalized)?)
}

pub fn decode_transport_text(data: &str) -> AppResult<String> {
    let bytes = decode_transport(data)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
