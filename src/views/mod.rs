//! Server-rendered pages. Everything interpolated into markup goes through
//! [`escape`].

mod home;
mod messages;
mod users;

use std::fmt::Write;

use axum::response::Html;

pub use self::{home::*, messages::*, users::*};
use crate::domain::{commands::FieldErrors, message::MessageWithAuthor, session::RequestContext, user::User};

pub fn escape(raw: &str) -> String {
	let mut escaped = String::with_capacity(raw.len());
	for c in raw.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#x27;"),
			c => escaped.push(c),
		}
	}
	escaped
}

fn document(
	title: &str,
	nav: &str,
	flash: &str,
	body: &str,
) -> String {
	format!(
		"<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title} | Warbler</title>\n\
		 <link rel=\"stylesheet\" href=\"/static/stylesheets/style.css\">\n</head>\n<body>\n\
		 <nav class=\"navbar\"><a class=\"navbar-brand\" href=\"/\">Warbler</a>\n\
		 <form class=\"navbar-search\" action=\"/users\"><input name=\"q\" placeholder=\"Search Warbler\"><button>Search</button></form>\n\
		 <ul class=\"nav\">{nav}</ul></nav>\n<main class=\"container\">\n{flash}{body}\n</main>\n</body>\n</html>\n",
		title = escape(title),
	)
}

/// Wraps `body` in the site layout: navigation for the current user and the
/// pending flash notice, if any.
pub(crate) fn layout(
	ctx: &RequestContext,
	title: &str,
	body: &str,
) -> Html<String> {
	let nav = match &ctx.current_user {
		Some(user) => format!(
			"<li><a href=\"/users/{id}\"><img src=\"{image}\" alt=\"{name}\" class=\"avatar\"></a></li>\
			 <li><a href=\"/messages/new\">New Message</a></li><li><a href=\"/logout\">Log out</a></li>",
			id = user.id,
			image = escape(&user.image_url),
			name = escape(&user.username),
		),
		None => "<li><a href=\"/signup\">Sign up</a></li><li><a href=\"/login\">Log in</a></li>".to_string(),
	};
	let flash = match ctx.flash {
		Some(flash) => format!(
			"<div class=\"alert alert-{}\">{}</div>\n",
			flash.category(),
			escape(&flash.message(ctx.current_user.as_ref()))
		),
		None => String::new(),
	};
	Html(document(title, &nav, &flash, body))
}

pub fn not_found() -> String {
	document(
		"Not found",
		"",
		"",
		"<h1>404</h1><p>Sorry, we could not find that page.</p><a href=\"/\">Go home</a>",
	)
}

pub fn error_page(message: &str) -> String {
	document("Error", "", "", &format!("<h1>Error</h1><p>{}</p><a href=\"/\">Go home</a>", escape(message)))
}

/// Danger alert used by forms for notices that belong to no single field.
fn notice(message: Option<&str>) -> String {
	message.map(|m| format!("<div class=\"alert alert-danger\">{}</div>", escape(m))).unwrap_or_default()
}

fn input(
	label: &str,
	name: &'static str,
	kind: &str,
	value: &str,
	errors: &FieldErrors,
) -> String {
	let mut html = format!(
		"<div class=\"form-group\"><label for=\"{name}\">{label}</label>\
		 <input id=\"{name}\" name=\"{name}\" type=\"{kind}\" value=\"{value}\" class=\"form-control\">",
		label = escape(label),
		value = escape(value),
	);
	for error in errors.get(name) {
		let _ = write!(html, "<span class=\"text-danger\">{}</span>", escape(error));
	}
	html.push_str("</div>");
	html
}

fn timestamp(message: &MessageWithAuthor) -> String {
	message.timestamp.format("%d %B %Y").to_string()
}

/// A warble list item with like and delete controls for the current user.
fn message_item(
	ctx: &RequestContext,
	message: &MessageWithAuthor,
	liked: bool,
) -> String {
	let mut controls = String::new();
	if let Some(user) = &ctx.current_user {
		if user.id == message.user_id {
			let _ = write!(
				controls,
				"<form method=\"POST\" action=\"/messages/{}/delete\"><button class=\"btn btn-danger\">Delete</button></form>",
				message.id
			);
		} else {
			let _ = write!(
				controls,
				"<form method=\"POST\" action=\"/users/add_like/{}\"><button class=\"btn {}\">{}</button></form>",
				message.id,
				if liked { "btn-primary liked" } else { "btn-secondary" },
				if liked { "Unlike" } else { "Like" },
			);
		}
	}
	format!(
		"<li class=\"message\" id=\"message-{id}\"><a href=\"/users/{user_id}\"><img src=\"{image}\" alt=\"\" class=\"avatar\"></a>\
		 <div class=\"message-area\"><a href=\"/users/{user_id}\">@{username}</a> <span class=\"text-muted\">{date}</span>\
		 <p><a href=\"/messages/{id}\">{text}</a></p>{controls}</div></li>",
		id = message.id,
		user_id = message.user_id,
		image = escape(&message.image_url),
		username = escape(&message.username),
		date = timestamp(message),
		text = escape(&message.text),
	)
}

fn message_list(
	ctx: &RequestContext,
	messages: &[MessageWithAuthor],
	liked_ids: &[i64],
) -> String {
	if messages.is_empty() {
		return "<p class=\"empty\">No messages yet.</p>".to_string();
	}
	let items: String = messages.iter().map(|m| message_item(ctx, m, liked_ids.contains(&m.id))).collect();
	format!("<ul class=\"messages\">{items}</ul>")
}

fn user_card(
	ctx: &RequestContext,
	user: &User,
	following_ids: &[i64],
) -> String {
	let mut button = String::new();
	if ctx.current_user.as_ref().is_some_and(|me| me.id != user.id) {
		let _ = if following_ids.contains(&user.id) {
			write!(
				button,
				"<form method=\"POST\" action=\"/users/stop-following/{}\"><button class=\"btn btn-primary\">Unfollow</button></form>",
				user.id
			)
		} else {
			write!(
				button,
				"<form method=\"POST\" action=\"/users/follow/{}\"><button class=\"btn btn-outline-primary\">Follow</button></form>",
				user.id
			)
		};
	}
	format!(
		"<div class=\"card user-card\"><img src=\"{image}\" alt=\"\" class=\"avatar\"><a href=\"/users/{id}\">@{username}</a>{button}<p>{bio}</p></div>",
		image = escape(&user.image_url),
		id = user.id,
		username = escape(&user.username),
		bio = escape(user.bio.as_deref().unwrap_or_default()),
	)
}

fn user_cards(
	ctx: &RequestContext,
	users: &[User],
	following_ids: &[i64],
) -> String {
	if users.is_empty() {
		return "<p class=\"empty\">Sorry, no users found.</p>".to_string();
	}
	users.iter().map(|user| user_card(ctx, user, following_ids)).collect()
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::domain::session::Flash;

	#[test]
	fn test_escape() {
		assert_eq!(escape("<b>\"Tom\" & 'Jerry'</b>"), "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;");
		assert_eq!(escape("plain"), "plain");
	}

	#[test]
	fn test_layout_renders_flash_and_anonymous_nav() {
		let ctx = RequestContext {
			current_user: None,
			flash: Some(Flash::AccessUnauthorized),
		};
		let Html(page) = layout(&ctx, "Home", "<p>body</p>");
		assert!(page.contains("Access unauthorized."));
		assert!(page.contains("href=\"/signup\""));
		assert!(page.contains("<p>body</p>"));
	}

	#[test]
	fn test_input_shows_field_errors() {
		let mut errors = FieldErrors::default();
		errors.add("username", "Username already taken");
		let html = input("Username", "username", "text", "<bob>", &errors);
		assert!(html.contains("value=\"&lt;bob&gt;\""));
		assert!(html.contains("Username already taken"));
	}
}
