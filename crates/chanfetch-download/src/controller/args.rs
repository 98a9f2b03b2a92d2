//! yt-dlp command line construction.

use std::path::{Path, PathBuf};

use chanfetch_core::{ChannelRequest, ContentFilter};

const CHANNEL_BASE_URL: &str = "https://www.youtube.com";

/// File name template: sequence number, title, extension.
const OUTPUT_TEMPLATE: &str = "%(autonumber)d-%(title)s.%(ext)s";

/// Channel tab URL. `All` keeps the trailing slash of the empty suffix.
pub fn channel_url(channel: &str, filter: ContentFilter) -> String {
    format!("{CHANNEL_BASE_URL}/@{channel}/{}", filter.url_suffix())
}

/// Per-channel folder under the destination root.
pub fn output_dir(request: &ChannelRequest) -> PathBuf {
    request.destination_root.join(format!("@{}", request.channel))
}

/// Prefer H.264 video with AAC audio at exactly `height`, then any format at
/// that height, then whatever is best.
pub fn format_selector(height: u32) -> String {
    format!(
        "bv[height={height}][ext=mp4][vcodec^=avc1]+ba[ext=m4a][acodec^=mp4a]/best[height={height}]/best"
    )
}

/// Full argument list for one channel job writing into `output_dir`.
pub fn build_args(request: &ChannelRequest, output_dir: &Path) -> Vec<String> {
    let template = output_dir.join(OUTPUT_TEMPLATE);

    vec![
        channel_url(&request.channel, request.filter),
        "-o".to_string(),
        template.to_string_lossy().into_owned(),
        "--format".to_string(),
        format_selector(request.resolution),
        "--merge-output-format".to_string(),
        "mp4".to_string(),
        "--write-thumbnail".to_string(),
        "--convert-thumbnails".to_string(),
        "jpg".to_string(),
        "--embed-thumbnail".to_string(),
        "--yes-playlist".to_string(),
        "--no-warnings".to_string(),
        "--progress".to_string(),
    ]
}
