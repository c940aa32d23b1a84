use std::thread;
use std::time::Duration;

use crate::Event;

/// Cancels the timer when dropped: the thread observes the channel
/// disconnect on its next wait and exits without sending again.
pub struct TimerHandle {
    _cancel: flume::Sender<()>,
}

/// Fire `Event::Tick` every `period` until the handle is dropped or
/// the receiving side goes away.
pub fn arm(period: Duration, tx: flume::Sender<Event>) -> TimerHandle {
    let (cancel, cancelled) = flume::bounded::<()>(0);
    thread::spawn(move || loop {
        match cancelled.recv_timeout(period) {
            Err(flume::RecvTimeoutError::Timeout) => {
                if tx.send(Event::Tick).is_err() {
                    break;
                }
            }
            _ => break,
        }
    });
    TimerHandle { _cancel: cancel }
}
