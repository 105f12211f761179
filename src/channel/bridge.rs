use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    channel::message::{EditRequest, broadcast_detail, request_message},
    config::runtime_config::RuntimeConfig,
    overlay::host::{FrameHost, TimerId},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// Reading the top-level context was refused (cross-origin)
    #[error("cannot inspect top-level context: {0}")]
    TopAccessDenied(String),

    #[error("failed to post message to parent: {0}")]
    PostFailed(String),
}

/// How a submitted request left the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Posted to the parent; resolution comes from a response or this timer
    AwaitingResponse { timer: TimerId },
    /// Broadcast locally; nothing to wait for
    Broadcast,
}

/// A page counts as embedded unless it can prove it is the top-level context.
pub fn is_embedded(host: &dyn FrameHost) -> bool {
    match host.is_top_level() {
        Ok(top) => !top,
        Err(e) => {
            debug!(error = %e, "embedding check failed, assuming embedded");
            true
        }
    }
}

/// Send `request` to whoever owns edits.
///
/// Embedded pages post `{type, data}` to the parent after starting the
/// response timer. If the post itself fails the timer is cancelled and the
/// request goes out as a local broadcast instead, exactly like a standalone
/// page.
pub fn deliver(host: &mut dyn FrameHost, config: &RuntimeConfig, request: &EditRequest) -> Delivery {
    if is_embedded(host) {
        let timer = host.start_timer(config.submit_timeout());
        match host.post_to_parent(&request_message(config, request)) {
            Ok(()) => {
                debug!(location = %request.source_location, ?timer, "edit request posted to parent");
                return Delivery::AwaitingResponse { timer };
            }
            Err(e) => {
                warn!(error = %e, "posting to parent failed, broadcasting locally");
                host.cancel_timer(timer);
            }
        }
    }

    host.broadcast(&config.message_type_data_request, &broadcast_detail(request));
    debug!(location = %request.source_location, "edit request broadcast");
    Delivery::Broadcast
}
