use std::io;
use std::path::Path;

use tokenmeter_core::Msg;

/// Build the selection message for a picked file. The media type is guessed
/// from the extension; the core update validates it against the supported set
/// and the size ceiling.
pub fn select(path: &Path) -> io::Result<Msg> {
    let metadata = std::fs::metadata(path)?;
    Ok(Msg::AttachmentSelected {
        path: path.to_path_buf(),
        media_type: guess_media_type(path).to_string(),
        size_bytes: metadata.len(),
    })
}

fn guess_media_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}
