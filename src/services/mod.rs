pub mod cdn;
pub mod github_client;
pub mod naming;
pub mod upload_service;
pub mod video_manager;

#[cfg(test)]
pub(crate) mod test_support;
