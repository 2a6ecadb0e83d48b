//! The built-in theme: gtmpl templates for the listing and detail pages and
//! the stylesheet that gives tiles their hover lift and the page its
//! fade-in. A project can replace any of these through `theme/theme.yaml`
//! (see [`crate::config`]); the defaults keep a bare project buildable.

/// Template for the publications listing page. Receives `tiles` (the
/// projected records in query order), `home_page`, and `static_url`. A tile
/// without a thumbnail renders no image slot at all.
pub const DEFAULT_LISTING_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Publications</title>
<link rel="stylesheet" href="{{.static_url}}style.css">
</head>
<body>
<div class="publications-page">
<h1>Publications</h1>
<div class="publications-container">
{{range .tiles}}<a class="publication" href="{{.href}}">
{{if .thumbnail}}<div class="publication-thumbnail"><img src="{{.thumbnail.src}}" srcset="{{.thumbnail.srcSet}}" sizes="{{.thumbnail.sizes}}" loading="lazy" alt="" style="background-image: url('{{.thumbnail.base64}}'); background-size: cover;"></div>
{{end}}<span class="publication-title">{{.title}}</span>
<span class="publication-year">{{.year}}</span>
</a>
{{end}}</div>
</div>
</body>
</html>
"#;

/// Template for a single publication's detail page. Receives `title`,
/// `year`, `html`, `thumbnail`, `home_page`, and `static_url`.
pub const DEFAULT_PUBLICATION_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{.title}}</title>
<link rel="stylesheet" href="{{.static_url}}style.css">
</head>
<body>
<div class="publication-page">
<a class="back-link" href="/publications/">Publications</a>
<h1>{{.title}}</h1>
<span class="publication-year">{{.year}}</span>
{{if .thumbnail}}<div class="publication-thumbnail"><img src="{{.thumbnail.src}}" srcset="{{.thumbnail.srcSet}}" sizes="{{.thumbnail.sizes}}" loading="lazy" alt=""></div>
{{end}}<div class="publication-body">
{{.html}}</div>
</div>
</body>
</html>
"#;

/// The default stylesheet. Ported from the site's previous incarnation:
/// a fade-in on the page, a horizontal flex row of 12rem tiles, a shadow
/// that lifts on hover, and a de-emphasized year caption under the title.
pub const DEFAULT_STYLESHEET: &str = r#"@keyframes fade-in {
  from { opacity: 0; }
  to { opacity: 1; }
}

.publications-page,
.publication-page {
  animation: fade-in 0.5s ease-in-out;
}

h1 {
  margin-bottom: 3rem;
}

.publications-container {
  display: flex;
  flex-direction: row;
}

.publication {
  width: 12rem;
  cursor: pointer;
  display: block;
  text-decoration: none;
  margin-left: 4rem;
}

.publication:first-of-type {
  margin-left: 0;
}

.publication:hover > div {
  box-shadow: 6px 6px 12px rgba(0, 0, 0, 0.15);
}

.publication:hover > span {
  opacity: 0.9;
}

.publication > div {
  transition: all 0.3s ease-in-out;
  border-radius: 4px;
  overflow: hidden;
  box-shadow: 12px 12px 24px rgba(0, 0, 0, 0.12);
}

.publication-thumbnail img {
  width: 100%;
  display: block;
}

.publication-title {
  color: #5a5a5a;
  opacity: 0.75;
  text-align: center;
  margin-top: 1rem;
  transition: all 0.3s ease-in-out;
  display: block;
  font-weight: 700;
  width: 100%;
}

.publication-year {
  color: #5a5a5a;
  opacity: 0.5;
  text-align: center;
  margin: 0;
  transition: all 0.3s ease-in-out;
  display: block;
  font-weight: 400;
  width: 100%;
}
"#;
