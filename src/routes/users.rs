use axum::{
	extract::{Path, Query, State},
	http::HeaderMap,
	response::{Html, IntoResponse, Redirect, Response},
	Extension, Form,
};
use axum_extra::extract::{CookieJar, WithRejection};

use super::local_referer;
use crate::{
	dependencies::AppState,
	domain::{
		commands::{FieldErrors, ProfileForm, UserSearch},
		session::{Flash, RequestContext, Session},
	},
	services::{
		handlers::{SocialHandler, UserHandler},
		response::ServiceError,
	},
	views,
};

async fn my_following_ids(
	state: &AppState,
	ctx: &RequestContext,
) -> Result<Vec<i64>, ServiceError> {
	match &ctx.current_user {
		Some(user) => SocialHandler::following_ids(&state.pool, user.id).await,
		None => Ok(Vec::new()),
	}
}

async fn my_liked_ids(
	state: &AppState,
	ctx: &RequestContext,
) -> Result<Vec<i64>, ServiceError> {
	match &ctx.current_user {
		Some(user) => SocialHandler::liked_message_ids(&state.pool, user.id).await,
		None => Ok(Vec::new()),
	}
}

/// `/users?q=` narrows the list to usernames containing `q`.
pub(super) async fn list_users(
	State(state): State<AppState>,
	Extension(ctx): Extension<RequestContext>,
	Query(search): Query<UserSearch>,
) -> Result<Html<String>, ServiceError> {
	let q = search.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
	let users = UserHandler::search(&state.pool, q).await?;
	let following_ids = my_following_ids(&state, &ctx).await?;
	Ok(views::users_index(&ctx, &users, &following_ids, q))
}

pub(super) async fn users_show(
	State(state): State<AppState>,
	Extension(ctx): Extension<RequestContext>,
	WithRejection(Path(user_id), _): WithRejection<Path<i64>, ServiceError>,
) -> Result<Html<String>, ServiceError> {
	let profile = UserHandler::profile(&state.pool, user_id).await?;
	let is_following = match &ctx.current_user {
		Some(me) => SocialHandler::is_following(&state.pool, me.id, user_id).await?,
		None => false,
	};
	let liked_ids = my_liked_ids(&state, &ctx).await?;
	Ok(views::user_show(&ctx, &profile, is_following, &liked_ids))
}

pub(super) async fn show_following(
	State(state): State<AppState>,
	Extension(ctx): Extension<RequestContext>,
	WithRejection(Path(user_id), _): WithRejection<Path<i64>, ServiceError>,
) -> Result<Html<String>, ServiceError> {
	ctx.require_user()?;
	let (user, following) = UserHandler::following(&state.pool, user_id).await?;
	let following_ids = my_following_ids(&state, &ctx).await?;
	Ok(views::user_relations(&ctx, &user, "Following", &following, &following_ids))
}

pub(super) async fn show_followers(
	State(state): State<AppState>,
	Extension(ctx): Extension<RequestContext>,
	WithRejection(Path(user_id), _): WithRejection<Path<i64>, ServiceError>,
) -> Result<Html<String>, ServiceError> {
	ctx.require_user()?;
	let (user, followers) = UserHandler::followers(&state.pool, user_id).await?;
	let following_ids = my_following_ids(&state, &ctx).await?;
	Ok(views::user_relations(&ctx, &user, "Followers", &followers, &following_ids))
}

pub(super) async fn show_likes(
	State(state): State<AppState>,
	Extension(ctx): Extension<RequestContext>,
	WithRejection(Path(user_id), _): WithRejection<Path<i64>, ServiceError>,
) -> Result<Html<String>, ServiceError> {
	ctx.require_user()?;
	let (user, messages) = UserHandler::likes(&state.pool, user_id).await?;
	let liked_ids = my_liked_ids(&state, &ctx).await?;
	Ok(views::user_likes(&ctx, &user, &messages, &liked_ids))
}

pub(super) async fn add_follow(
	State(state): State<AppState>,
	Extension(ctx): Extension<RequestContext>,
	jar: CookieJar,
	WithRejection(Path(follow_id), _): WithRejection<Path<i64>, ServiceError>,
) -> Result<Response, ServiceError> {
	let me = ctx.require_user()?;
	let redirect = Redirect::to(&format!("/users/{}/following", me.id));
	match SocialHandler::follow(&state.pool, me.id, follow_id).await {
		Ok(_) => Ok(redirect.into_response()),
		Err(ServiceError::SelfFollow) => Ok((jar.add(Flash::SelfFollow.cookie()), redirect).into_response()),
		Err(err) => Err(err),
	}
}

pub(super) async fn stop_following(
	State(state): State<AppState>,
	Extension(ctx): Extension<RequestContext>,
	WithRejection(Path(follow_id), _): WithRejection<Path<i64>, ServiceError>,
) -> Result<Redirect, ServiceError> {
	let me = ctx.require_user()?;
	SocialHandler::unfollow(&state.pool, me.id, follow_id).await?;
	Ok(Redirect::to(&format!("/users/{}/following", me.id)))
}

pub(super) async fn edit_profile(Extension(ctx): Extension<RequestContext>) -> Result<Html<String>, ServiceError> {
	let me = ctx.require_user()?;
	let form = ProfileForm {
		username: me.username.clone(),
		email: me.email.clone(),
		image_url: me.image_url.clone(),
		header_image_url: me.header_image_url.clone(),
		bio: me.bio.clone().unwrap_or_default(),
		location: me.location.clone().unwrap_or_default(),
		password: String::new(),
	};
	Ok(views::profile_edit(&ctx, &form, &FieldErrors::default()))
}

/// Applies the non-blank fields after checking the current password.
pub(super) async fn update_profile(
	State(state): State<AppState>,
	Extension(ctx): Extension<RequestContext>,
	Form(form): Form<ProfileForm>,
) -> Result<Response, ServiceError> {
	let me = ctx.require_user()?;
	if let Err(errors) = form.validate() {
		return Ok(views::profile_edit(&ctx, &form, &errors).into_response());
	}

	let mut errors = FieldErrors::default();
	match UserHandler::update_profile(&state.pool, me.id, &form.password, form.changes()).await {
		Ok(user) => return Ok(Redirect::to(&format!("/users/{}", user.id)).into_response()),
		Err(ServiceError::InvalidCredentials) => errors.add("password", "Incorrect password."),
		Err(ServiceError::Duplicate(field)) => errors.add(field.field_name(), field.to_string()),
		Err(err) => {
			tracing::error!("Profile update failed : {}", err);
			let ctx = RequestContext {
				flash: Some(Flash::ProfileUpdateFailed),
				..ctx.clone()
			};
			return Ok(views::profile_edit(&ctx, &form, &errors).into_response());
		}
	}
	Ok(views::profile_edit(&ctx, &form, &errors).into_response())
}

/// Deletes the account with everything hanging off it, then logs out.
pub(super) async fn delete_user(
	State(state): State<AppState>,
	Extension(ctx): Extension<RequestContext>,
	jar: CookieJar,
) -> Result<Response, ServiceError> {
	let me = ctx.require_user()?;
	UserHandler::delete_user(&state.pool, me.id).await?;
	Ok((jar.remove(Session::removal_cookie()), Redirect::to("/signup")).into_response())
}

/// Toggles the like and sends the browser back where it came from.
pub(super) async fn add_like(
	State(state): State<AppState>,
	Extension(ctx): Extension<RequestContext>,
	headers: HeaderMap,
	WithRejection(Path(message_id), _): WithRejection<Path<i64>, ServiceError>,
) -> Result<Redirect, ServiceError> {
	let me = ctx.current_user.as_ref().ok_or(ServiceError::Unauthorized(Flash::LoginRequiredToLike))?;
	SocialHandler::toggle_like(&state.pool, me.id, message_id).await?;
	Ok(Redirect::to(&local_referer(&headers).unwrap_or_else(|| "/".to_string())))
}
