//! Identity provider boundary.
//!
//! User accounts are owned by an external identity service; the core only
//! ever asks whether a user id exists. Two ready implementations are
//! provided: [`AllowAll`] for embedders that authenticate upstream, and
//! [`StaticDirectory`] for tests and fixed deployments.

use std::{collections::HashSet, convert::Infallible, future::Future};

use uuid::Uuid;

/// Abstraction over the external identity service.
pub trait IdentityProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// True iff `user_id` names a known user.
  fn verify_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

/// Accepts every user id. For embedders whose transport layer has already
/// authenticated the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl IdentityProvider for AllowAll {
  type Error = Infallible;

  async fn verify_user(&self, _user_id: Uuid) -> Result<bool, Infallible> {
    Ok(true)
  }
}

/// A fixed allow-set of user ids.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
  users: HashSet<Uuid>,
}

impl StaticDirectory {
  pub fn new(users: impl IntoIterator<Item = Uuid>) -> Self {
    Self { users: users.into_iter().collect() }
  }
}

impl IdentityProvider for StaticDirectory {
  type Error = Infallible;

  async fn verify_user(&self, user_id: Uuid) -> Result<bool, Infallible> {
    Ok(self.users.contains(&user_id))
  }
}
