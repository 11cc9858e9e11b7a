//! Clipboard support for committed results.

use super::format::number_to_string;
use arboard::Clipboard;
use tracing::debug;

/// Copy a result to the system clipboard in full precision.
///
/// Returns the text that was copied, or an error message on failure.
pub fn copy_result(value: f64) -> Result<String, String> {
    let text = number_to_string(value);

    let mut clipboard =
        Clipboard::new().map_err(|e| format!("Failed to access clipboard: {}", e))?;

    clipboard
        .set_text(text.clone())
        .map_err(|e| format!("Failed to copy to clipboard: {}", e))?;

    debug!(text = %text, "Copied result to clipboard");
    Ok(text)
}
