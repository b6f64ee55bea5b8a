//! Server-rendered HTML for the upload form and the gallery.

use std::fmt::Write as _;

use crate::services::{cdn::html_escape, video_manager::ListedVideo};

const STYLE: &str = r#"
<style>
  body { font-family: system-ui, sans-serif; max-width: 880px; margin: 2rem auto; padding: 0 1rem; color: #1f2328; }
  nav a { margin-right: 1rem; }
  #drop { border: 2px dashed #8c959f; border-radius: 8px; padding: 3rem; text-align: center; cursor: pointer; }
  #drop.over { border-color: #0969da; background: #f0f6ff; }
  .ok { color: #1a7f37; }
  .err { color: #cf222e; }
  .video { border-bottom: 1px solid #d0d7de; padding: 1rem 0; }
  .video code { word-break: break-all; }
  video { max-width: 100%; max-height: 240px; }
</style>
"#;

const UPLOAD_PAGE_BODY: &str = r#"
<h1>Video uploader</h1>
<nav><a href="/">Upload</a><a href="/gallery">Gallery</a></nav>
<p id="config"></p>
<div id="drop">Drop a video here or click to choose one<br><small>mp4, webm, mov, avi, mkv &middot; 50MB max</small></div>
<input type="file" id="file" accept="video/*" hidden>
<p id="status"></p>
<script>
const drop = document.getElementById('drop');
const input = document.getElementById('file');
const statusLine = document.getElementById('status');

fetch('/config').then(r => r.json()).then(c => {
  document.getElementById('config').textContent = c.configured
    ? `Uploading to ${c.username}/${c.repo}`
    : `Not configured: ${c.error}`;
});

function show(text, cls) {
  statusLine.className = cls;
  statusLine.textContent = text;
}

async function upload(file) {
  const form = new FormData();
  form.append('file', file);
  show(`Uploading ${file.name}...`, '');
  try {
    const res = await fetch('/upload', { method: 'POST', body: form });
    const body = await res.json();
    if (!res.ok) { show(body.error, 'err'); return; }
    show(`${body.filename}: ${body.url}`, 'ok');
  } catch (e) {
    show(String(e), 'err');
  }
}

drop.addEventListener('click', () => input.click());
input.addEventListener('change', () => input.files[0] && upload(input.files[0]));
drop.addEventListener('dragover', e => { e.preventDefault(); drop.classList.add('over'); });
drop.addEventListener('dragleave', () => drop.classList.remove('over'));
drop.addEventListener('drop', e => {
  e.preventDefault();
  drop.classList.remove('over');
  if (e.dataTransfer.files[0]) upload(e.dataTransfer.files[0]);
});
</script>
"#;

const GALLERY_SCRIPT: &str = r#"
<script>
async function removeVideo(button) {
  const name = button.dataset.name;
  if (!confirm(`Delete ${name}?`)) return;
  const res = await fetch(`/delete/${encodeURIComponent(name)}`, { method: 'DELETE' });
  const body = await res.json();
  if (res.ok) { button.closest('.video').remove(); } else { alert(body.error); }
}
</script>
"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n{}</head>\n<body>{}</body>\n</html>\n",
        html_escape(title),
        STYLE,
        body
    )
}

pub fn upload_page() -> String {
    layout("Video uploader", UPLOAD_PAGE_BODY)
}

pub fn gallery_page(videos: &[ListedVideo], error: Option<&str>) -> String {
    let mut body = String::from(
        "\n<h1>Gallery</h1>\n<nav><a href=\"/\">Upload</a><a href=\"/gallery\">Gallery</a></nav>\n",
    );

    if let Some(error) = error {
        let _ = writeln!(body, "<p class=\"err\">{}</p>", html_escape(error));
    } else if videos.is_empty() {
        body.push_str("<p>No videos uploaded yet.</p>\n");
    } else {
        let _ = writeln!(body, "<p>{} video(s)</p>", videos.len());
    }

    for video in videos {
        let name = html_escape(&video.asset.name);
        let url = html_escape(&video.cdn_url);
        let _ = write!(
            body,
            concat!(
                "<div class=\"video\">",
                "<h3>{name}</h3>",
                "<video src=\"{url}\" muted loop controls preload=\"metadata\"></video>",
                "<p>{size:.1} MB &middot; sha {sha}</p>",
                "<p><code>{url}</code></p>",
                "<button data-name=\"{name}\" onclick=\"removeVideo(this)\">Delete</button>",
                "</div>\n"
            ),
            name = name,
            url = url,
            size = video.asset.size_mb(),
            sha = html_escape(video.asset.short_hash()),
        );
    }

    body.push_str(GALLERY_SCRIPT);
    layout("Gallery", &body)
}
