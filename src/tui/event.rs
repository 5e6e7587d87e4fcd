//! Terminal event handling.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Events delivered to the main loop.
pub enum Event {
    /// Periodic redraw tick.
    Tick,
    /// Key press.
    Key(KeyEvent),
    /// Terminal resized to (width, height).
    Resize(u16, u16),
}

/// Polls crossterm on a background thread and forwards events over a
/// channel, emitting a tick whenever the poll interval elapses quietly.
pub struct EventHandler {
    receiver: mpsc::Receiver<Event>,
    _handle: thread::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::channel();
        let handle = thread::spawn(move || {
            loop {
                let ready = match event::poll(tick_rate) {
                    Ok(ready) => ready,
                    Err(_) => break,
                };
                let message = if ready {
                    match event::read() {
                        // Key releases are reported on some terminals; only
                        // presses drive the UI.
                        Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => Event::Key(key),
                        Ok(CtEvent::Resize(w, h)) => Event::Resize(w, h),
                        Ok(_) => continue,
                        Err(_) => break,
                    }
                } else {
                    Event::Tick
                };
                if sender.send(message).is_err() {
                    break;
                }
            }
        });
        Self {
            receiver,
            _handle: handle,
        }
    }

    /// Blocks until the next event.
    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.receiver.recv()
    }
}
