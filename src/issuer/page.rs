use super::{Theme, PASSWORD_PATH};
use crate::render::escape_html;

pub fn login_page(theme: &Theme, email: Option<&str>, error: Option<&str>) -> String {
    let title = escape_html(&theme.title);
    let email = escape_html(email.unwrap_or_default());
    let error = error
        .map(|msg| format!("<p class=\"error\" role=\"alert\">{}</p>\n", escape_html(msg)))
        .unwrap_or_default();

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Sign in - {title}</title>
<style>
body {{ font-family: system-ui, sans-serif; max-width: 24rem; margin: 4rem auto; padding: 0 1rem; }}
label {{ display: block; margin-top: 1rem; }}
input {{ width: 100%; box-sizing: border-box; }}
.error {{ color: #b00020; }}
</style>
</head>
<body>
<h1>{title}</h1>
{error}<form method="post" action="{PASSWORD_PATH}">
<label>Email <input type="email" name="email" value="{email}" required autofocus></label>
<label>Password <input type="password" name="password" required></label>
<p><button type="submit">Sign in</button></p>
</form>
</body>
</html>
"#
    )
}
