use axum::response::Html;

const FORM_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
	<meta charset="utf-8">
	<title>GitHub Stars by Org</title>
</head>
<body>
	<h1>GitHub Stars by Org</h1>
	<form action="/github/org_stars/chart" method="get">
		<label for="org">Enter the organization name:</label>
		<input id="org" name="org" type="text" required pattern="[A-Za-z0-9-]{1,39}">
		<button type="submit">Plot</button>
	</form>
	<p>Fetching a large organization for the first time can take a while.</p>
</body>
</html>
"#;

/// Axum handler: GET /
pub async fn handler() -> Html<&'static str> {
	Html(FORM_PAGE)
}
