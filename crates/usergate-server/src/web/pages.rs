//! Minimal server-rendered pages. These exist so the guard has real
//! targets; the dashboard data comes from the JSON API.

use axum::response::Html;

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title} - usergate</title></head>\n<body>\n<h1>{title}</h1>\n{body}\n</body>\n</html>\n"
    ))
}

/// GET /login
pub async fn login_page() -> Html<String> {
    page(
        "Login",
        r#"<form id="login">
<label>Email <input type="email" name="email" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Log in</button>
</form>
<script>
document.getElementById("login").addEventListener("submit", async (e) => {
  e.preventDefault();
  const form = new FormData(e.target);
  const res = await fetch("/auth/login", {
    method: "POST",
    headers: {"Content-Type": "application/json"},
    body: JSON.stringify(Object.fromEntries(form)),
  });
  if (res.ok) { window.location = "/dashboard"; }
  else { alert((await res.json()).error); }
});
</script>"#,
    )
}

/// GET /dashboard
pub async fn dashboard_page() -> Html<String> {
    page(
        "Dashboard",
        r#"<p>User data is served by <code>GET /users</code>.</p>
<p><a href="/settings">Settings</a></p>"#,
    )
}

/// GET /settings
pub async fn settings_page() -> Html<String> {
    page(
        "Settings",
        r#"<button id="logout" type="button">Log out</button>
<script>
document.getElementById("logout").addEventListener("click", async () => {
  await fetch("/auth/logout", {method: "POST"});
  window.location = "/login";
});
</script>"#,
    )
}
