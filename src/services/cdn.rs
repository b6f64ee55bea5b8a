//! jsDelivr addressing and HTML embed snippets. No I/O happens here.

use reqwest::Url;
use std::path::Path;

use crate::services::naming::extension_of;

/// Everything needed to turn a destination name into a public CDN URL.
#[derive(Debug, Clone)]
pub struct CdnAddress {
    pub base: String,
    pub account: String,
    pub repository: String,
    pub branch: String,
    pub videos_dir: String,
}

impl CdnAddress {
    /// `{base}/{account}/{repository}@{branch}/{videos_dir}/{name}`
    ///
    /// Directory and name are pushed as path segments, so characters such as
    /// spaces or `#` are percent-encoded.
    pub fn url(&self, name: &str) -> String {
        let prefix = format!(
            "{}/{}/{}@{}/",
            self.base.trim_end_matches('/'),
            self.account,
            self.repository,
            self.branch
        );
        let fallback = || format!("{}{}/{}", prefix, self.videos_dir.trim_matches('/'), name);

        let Ok(mut url) = Url::parse(&prefix) else {
            return fallback();
        };
        match url.path_segments_mut() {
            Ok(mut segments) => {
                segments
                    .pop_if_empty()
                    .extend(self.videos_dir.split('/').filter(|s| !s.is_empty()))
                    .push(name);
            }
            Err(()) => return fallback(),
        }
        url.into()
    }
}

fn video_mime(name: &str) -> &'static str {
    match extension_of(Path::new(name)).as_deref() {
        Some("webm") => "video/webm",
        Some("mov") => "video/quicktime",
        Some("avi") => "video/x-msvideo",
        Some("mkv") => "video/x-matroska",
        _ => "video/mp4",
    }
}

/// Full-screen autoplaying background video referencing `url`.
pub fn html_snippet(name: &str, url: &str) -> String {
    format!(
        r#"<!-- Background video: {name} -->
<div class="video-background">
    <video autoplay muted loop playsinline>
        <source src="{url}" type="{mime}">
        Your browser does not support HTML5 video.
    </video>
</div>

<style>
.video-background {{
    position: fixed;
    top: 0;
    left: 0;
    width: 100%;
    height: 100%;
    z-index: -1;
    overflow: hidden;
}}

.video-background video {{
    width: 100%;
    height: 100%;
    object-fit: cover;
}}
</style>
"#,
        name = html_escape(&name.replace("--", "- -")),
        url = html_escape(url),
        mime = video_mime(name),
    )
}

pub fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
