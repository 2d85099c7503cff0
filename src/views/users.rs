use axum::response::Html;

use super::{escape, input, layout, message_list, notice, user_cards};
use crate::domain::{
	commands::{FieldErrors, LoginForm, ProfileForm, SignupForm},
	message::MessageWithAuthor,
	session::RequestContext,
	user::{User, UserProfile},
};

pub fn signup_page(
	ctx: &RequestContext,
	form: &SignupForm,
	errors: &FieldErrors,
) -> Html<String> {
	let body = format!(
		"<h2>Join Warbler today.</h2><form method=\"POST\" action=\"/signup\">{}{}{}{}\
		 <button class=\"btn btn-primary\">Sign me up!</button></form>",
		input("Username", "username", "text", &form.username, errors),
		input("E-mail", "email", "email", &form.email, errors),
		input("Password", "password", "password", "", errors),
		input("(Optional) Image URL", "image_url", "text", &form.image_url, errors),
	);
	layout(ctx, "Sign up", &body)
}

pub fn login_page(
	ctx: &RequestContext,
	form: &LoginForm,
	errors: &FieldErrors,
	failure: Option<&str>,
) -> Html<String> {
	let body = format!(
		"<h2>Welcome back.</h2>{}<form method=\"POST\" action=\"/login\">{}{}\
		 <button class=\"btn btn-primary\">Log in</button></form>",
		notice(failure),
		input("Username", "username", "text", &form.username, errors),
		input("Password", "password", "password", "", errors),
	);
	layout(ctx, "Log in", &body)
}

pub fn users_index(
	ctx: &RequestContext,
	users: &[User],
	following_ids: &[i64],
	q: Option<&str>,
) -> Html<String> {
	let heading = match q {
		Some(q) => format!("<h2>Users matching \u{201c}{}\u{201d}</h2>", escape(q)),
		None => "<h2>Users</h2>".to_string(),
	};
	layout(ctx, "Users", &format!("{heading}<div class=\"user-cards\">{}</div>", user_cards(ctx, users, following_ids)))
}

fn profile_header(
	ctx: &RequestContext,
	profile: &UserProfile,
	is_following: bool,
) -> String {
	let action = if ctx.is_current_user(profile.id) {
		"<a href=\"/users/profile\" class=\"btn btn-outline-secondary\">Edit Profile</a>\
		 <form method=\"POST\" action=\"/users/delete\"><button class=\"btn btn-outline-danger\">Delete Profile</button></form>"
			.to_string()
	} else if ctx.current_user.is_some() {
		let (path, label) = if is_following { ("stop-following", "Unfollow") } else { ("follow", "Follow") };
		format!(
			"<form method=\"POST\" action=\"/users/{path}/{}\"><button class=\"btn btn-primary\">{label}</button></form>",
			profile.id
		)
	} else {
		String::new()
	};

	format!(
		"<img src=\"{header}\" alt=\"\" class=\"profile-header\">\
		 <img src=\"{image}\" alt=\"\" class=\"profile-avatar\"><h4>@{username}</h4>\
		 <p class=\"bio\">{bio}</p><p class=\"location\">{location}</p>\
		 <ul class=\"profile-stats\">\
		 <li><a href=\"/users/{id}\">Messages <b>{messages}</b></a></li>\
		 <li><a href=\"/users/{id}/following\">Following <b>{following}</b></a></li>\
		 <li><a href=\"/users/{id}/followers\">Followers <b>{followers}</b></a></li>\
		 <li><a href=\"/users/{id}/likes\">Likes <b>{likes}</b></a></li></ul>{action}",
		header = escape(&profile.header_image_url),
		image = escape(&profile.image_url),
		username = escape(&profile.username),
		bio = escape(profile.bio.as_deref().unwrap_or_default()),
		location = escape(profile.location.as_deref().unwrap_or_default()),
		id = profile.id,
		messages = profile.message_count,
		following = profile.following_count,
		followers = profile.followers_count,
		likes = profile.likes_count,
	)
}

pub fn user_show(
	ctx: &RequestContext,
	profile: &UserProfile,
	is_following: bool,
	liked_ids: &[i64],
) -> Html<String> {
	let body = format!(
		"{}<section class=\"timeline\">{}</section>",
		profile_header(ctx, profile, is_following),
		message_list(ctx, &profile.messages, liked_ids)
	);
	layout(ctx, &format!("@{}", profile.username), &body)
}

/// Users `user` follows, or users following `user`, depending on `heading`.
pub fn user_relations(
	ctx: &RequestContext,
	user: &User,
	heading: &str,
	users: &[User],
	following_ids: &[i64],
) -> Html<String> {
	let body = format!(
		"<h2><a href=\"/users/{}\">@{}</a> &middot; {}</h2><div class=\"user-cards\">{}</div>",
		user.id,
		escape(&user.username),
		escape(heading),
		user_cards(ctx, users, following_ids)
	);
	layout(ctx, heading, &body)
}

pub fn user_likes(
	ctx: &RequestContext,
	user: &User,
	messages: &[MessageWithAuthor],
	liked_ids: &[i64],
) -> Html<String> {
	let body = format!(
		"<h2><a href=\"/users/{}\">@{}</a> &middot; Likes</h2><section class=\"timeline\">{}</section>",
		user.id,
		escape(&user.username),
		message_list(ctx, messages, liked_ids)
	);
	layout(ctx, "Likes", &body)
}

pub fn profile_edit(
	ctx: &RequestContext,
	form: &ProfileForm,
	errors: &FieldErrors,
) -> Html<String> {
	let body = format!(
		"<h2>Edit Your Profile.</h2><form method=\"POST\" action=\"/users/profile\">{}{}{}{}{}{}\
		 <p>To confirm changes, enter your password:</p>{}\
		 <button class=\"btn btn-success\">Edit this user!</button> <a href=\"/\" class=\"btn btn-outline-secondary\">Cancel</a></form>",
		input("Username", "username", "text", &form.username, errors),
		input("E-mail", "email", "email", &form.email, errors),
		input("Image URL", "image_url", "text", &form.image_url, errors),
		input("Header Image URL", "header_image_url", "text", &form.header_image_url, errors),
		input("Bio", "bio", "text", &form.bio, errors),
		input("Location", "location", "text", &form.location, errors),
		input("Password", "password", "password", "", errors),
	);
	layout(ctx, "Edit Profile", &body)
}
