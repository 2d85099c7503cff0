use axum::response::Html;

use super::{escape, layout, message_item};
use crate::domain::{
	commands::{FieldErrors, MessageForm},
	message::{MessageWithAuthor, MAX_MESSAGE_LEN},
	session::RequestContext,
};

pub fn message_new(
	ctx: &RequestContext,
	form: &MessageForm,
	errors: &FieldErrors,
) -> Html<String> {
	let error_list: String = errors.get("text").iter().map(|e| format!("<span class=\"text-danger\">{}</span>", escape(e))).collect();
	let body = format!(
		"<h2>New Message</h2><form method=\"POST\" action=\"/messages/new\">\
		 <textarea name=\"text\" maxlength=\"{MAX_MESSAGE_LEN}\" placeholder=\"What's happening?\" class=\"form-control\">{text}</textarea>\
		 {error_list}<button class=\"btn btn-success\">Add my message!</button></form>",
		text = escape(&form.text),
	);
	layout(ctx, "New Message", &body)
}

pub fn message_show(
	ctx: &RequestContext,
	message: &MessageWithAuthor,
	like_count: i64,
	liked: bool,
) -> Html<String> {
	let body = format!(
		"<ul class=\"messages message-detail\">{item}</ul><p class=\"likes\">{like_count} {noun}</p>",
		item = message_item(ctx, message, liked),
		noun = if like_count == 1 { "like" } else { "likes" },
	);
	layout(ctx, "Message", &body)
}
