use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UserStatusUpdateRequest {
    pub status: bool,
}
