use axum::{
	extract::{Path, State},
	response::{Html, IntoResponse, Redirect, Response},
	Extension, Form,
};
use axum_extra::extract::WithRejection;

use crate::{
	dependencies::AppState,
	domain::{
		commands::{FieldErrors, MessageForm},
		session::RequestContext,
	},
	services::{
		handlers::{MessageHandler, SocialHandler},
		response::ServiceError,
	},
	views,
};

pub(super) async fn new_message_form(Extension(ctx): Extension<RequestContext>) -> Result<Html<String>, ServiceError> {
	ctx.require_user()?;
	Ok(views::message_new(&ctx, &MessageForm::default(), &FieldErrors::default()))
}

pub(super) async fn add_message(
	State(state): State<AppState>,
	Extension(ctx): Extension<RequestContext>,
	Form(form): Form<MessageForm>,
) -> Result<Response, ServiceError> {
	let user = ctx.require_user()?;
	match MessageHandler::create_message(&state.pool, user.id, &form.text).await {
		Ok(_) => Ok(Redirect::to(&format!("/users/{}", user.id)).into_response()),
		Err(ServiceError::Validation(errors)) => Ok(views::message_new(&ctx, &form, &errors).into_response()),
		Err(err) => Err(err),
	}
}

pub(super) async fn show_message(
	State(state): State<AppState>,
	Extension(ctx): Extension<RequestContext>,
	WithRejection(Path(message_id), _): WithRejection<Path<i64>, ServiceError>,
) -> Result<Html<String>, ServiceError> {
	let (message, like_count) = MessageHandler::get_message(&state.pool, message_id).await?;
	let liked = match &ctx.current_user {
		Some(user) => SocialHandler::liked_message_ids(&state.pool, user.id).await?.contains(&message.id),
		None => false,
	};
	Ok(views::message_show(&ctx, &message, like_count, liked))
}

/// Owner only; anyone else is bounced home with "Access unauthorized.".
pub(super) async fn delete_message(
	State(state): State<AppState>,
	Extension(ctx): Extension<RequestContext>,
	WithRejection(Path(message_id), _): WithRejection<Path<i64>, ServiceError>,
) -> Result<Redirect, ServiceError> {
	let user = ctx.require_user()?;
	MessageHandler::delete_message(&state.pool, user.id, message_id).await?;
	Ok(Redirect::to(&format!("/users/{}", user.id)))
}
