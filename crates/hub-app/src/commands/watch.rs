use std::future::Future;
use std::io;

use hub_bridge::Channel;
use hub_common::{ChannelEvent, HubError, Result};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

/// One printable line per event; `None` for events not worth printing.
pub fn describe_event(event: &ChannelEvent) -> Option<String> {
    match event {
        ChannelEvent::PropertyChanged {
            object,
            property,
            value,
        } => Some(format!("{object}.{property} = {value}")),
        ChannelEvent::Signal {
            object,
            signal,
            args,
        } => {
            let args: Vec<String> = args.iter().map(ToString::to_string).collect();
            Some(format!("{object}.{signal}({})", args.join(", ")))
        }
        ChannelEvent::Closed => Some("channel closed".into()),
        ChannelEvent::Connected { .. } | ChannelEvent::Unknown => None,
    }
}

/// Feed event lines to `sink` until the channel closes or Ctrl-C.
///
/// Subscribes before returning, so nothing published after this call is missed.
pub fn watch<F>(channel: &Channel, sink: F) -> impl Future<Output = Result<()>>
where
    F: FnMut(String),
{
    watch_until(channel, sink, tokio::signal::ctrl_c())
}

/// [`watch`] with the interrupt source supplied by the caller. A failing
/// interrupt source ends the watch with `HubError::Io`.
pub fn watch_until<F, I>(
    channel: &Channel,
    mut sink: F,
    interrupt: I,
) -> impl Future<Output = Result<()>>
where
    F: FnMut(String),
    I: Future<Output = io::Result<()>>,
{
    let mut events = channel.events();
    let already_closed = channel.is_closed();

    async move {
        if already_closed {
            sink("channel closed".into());
            return Ok(());
        }

        tokio::pin!(interrupt);
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Ok(event) => {
                        if let Some(line) = describe_event(&event) {
                            sink(line);
                        }
                        if event == ChannelEvent::Closed {
                            return Ok(());
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Watcher fell behind; events dropped");
                    }
                    Err(RecvError::Closed) => return Ok(()),
                },
                interrupted = &mut interrupt => {
                    if let Err(e) = interrupted {
                        return Err(HubError::Io(e));
                    }
                    info!("Interrupted");
                    return Ok(());
                }
            }
        }
    }
}
