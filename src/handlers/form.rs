//! Browser upload form.

use axum::response::Html;

const UPLOAD_FORM_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>Upload</title></head>
<body>
  <form enctype="multipart/form-data" action="/upload" method="post">
    <input type="file" name="file" />
    <input type="submit" value="Upload" />
  </form>
</body>
</html>"#;

pub async fn upload_form() -> Html<&'static str> {
    Html(UPLOAD_FORM_HTML)
}
