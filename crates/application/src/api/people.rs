//! Member registry and user account endpoints.

use portal_domain::{ApiRequest, Member, MemberFilter, MultipartField, RequestBody, User};

use super::{DEFAULT_STALE_AFTER, PortalApi, SLOW_STALE_AFTER};
use crate::error::GatewayResult;

/// `members/*` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct MembersApi<'a> {
    api: &'a PortalApi,
}

impl<'a> MembersApi<'a> {
    const RESOURCE: &'static str = "members/";

    pub(super) const fn new(api: &'a PortalApi) -> Self {
        Self { api }
    }

    /// Lists members matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a member list.
    pub async fn list(&self, filter: &MemberFilter) -> GatewayResult<Vec<Member>> {
        let request = filter
            .query()
            .into_iter()
            .fold(ApiRequest::get("members/list"), |request, (key, value)| {
                request.with_query(key, value)
            });
        self.api.cached_list(request, SLOW_STALE_AFTER).await
    }

    /// Registers a member.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create(&self, member: &Member) -> GatewayResult<()> {
        let request = ApiRequest::post("members/create").with_body(RequestBody::json(member)?);
        self.api.mutate(request, Self::RESOURCE).await
    }

    /// Replaces the member identified by `member_code`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update(&self, member_code: &str, member: &Member) -> GatewayResult<()> {
        let request = ApiRequest::put(format!("members/update/{member_code}"))
            .with_body(RequestBody::json(member)?);
        self.api.mutate(request, Self::RESOURCE).await
    }

    /// Replaces the registry with the members in a spreadsheet export.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects the file.
    pub async fn sync(&self, sheet: MultipartField) -> GatewayResult<()> {
        let request = ApiRequest::post("members/sync_members")
            .with_body(RequestBody::Multipart(vec![sheet.renamed("file")]));
        self.api.mutate(request, Self::RESOURCE).await
    }

    /// Removes the member identified by `member_code`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&self, member_code: &str) -> GatewayResult<()> {
        let request = ApiRequest::delete(format!("members/delete/{member_code}"));
        self.api.mutate(request, Self::RESOURCE).await
    }
}

/// `users/*` endpoints.
#[derive(Debug, Clone, Copy)]
pub struct UsersApi<'a> {
    api: &'a PortalApi,
}

impl<'a> UsersApi<'a> {
    const RESOURCE: &'static str = "users/";

    pub(super) const fn new(api: &'a PortalApi) -> Self {
        Self { api }
    }

    /// Lists all user accounts (admin only).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a user list.
    pub async fn list(&self) -> GatewayResult<Vec<User>> {
        self.api
            .cached_list(ApiRequest::get("users/list"), DEFAULT_STALE_AFTER)
            .await
    }

    /// Lists the board members.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a user list.
    pub async fn board(&self) -> GatewayResult<Vec<User>> {
        self.api
            .cached_list(ApiRequest::get("users/board"), DEFAULT_STALE_AFTER)
            .await
    }

    /// Lists the control committee.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a user list.
    pub async fn control(&self) -> GatewayResult<Vec<User>> {
        self.api
            .cached_list(ApiRequest::get("users/control"), DEFAULT_STALE_AFTER)
            .await
    }

    /// Replaces the account `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn update(&self, id: &str, user: &User) -> GatewayResult<()> {
        let request =
            ApiRequest::put(format!("users/update/{id}")).with_body(RequestBody::json(user)?);
        self.api.mutate(request, Self::RESOURCE).await
    }

    /// Deletes the account `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&self, id: &str) -> GatewayResult<()> {
        self.api
            .mutate(ApiRequest::delete(format!("users/delete/{id}")), Self::RESOURCE)
            .await
    }
}
