//! Shared state handed to every handler.

use crate::llm::ChatClient;
use crate::memory::MemoryService;
use crate::profile::ProfileStore;
use std::sync::Arc;

pub struct ApiState {
    pub memory: Arc<MemoryService>,
    pub chat: Arc<ChatClient>,
    pub profiles: Arc<ProfileStore>,
}
