//! Terminal event handling.
//!
//! A dedicated thread polls crossterm and forwards key/resize events,
//! interleaved with ticks at a fixed rate, over a channel to the main
//! loop. Ticks drive the fetch-outcome polling and the loading spinner.

use std::sync::mpsc::{self, Receiver, RecvError};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// An event delivered to the main loop.
#[derive(Debug)]
pub enum Event {
    /// Periodic tick.
    Tick,
    /// A key press.
    Key(KeyEvent),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
}

/// Background event reader with a fixed tick rate.
pub struct EventHandler {
    receiver: Receiver<Event>,
}

impl EventHandler {
    /// Spawns the event thread.
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);
                let ready = match event::poll(timeout) {
                    Ok(ready) => ready,
                    Err(_) => return,
                };
                if ready {
                    let forwarded = match event::read() {
                        // Ignore release/repeat so keys act once.
                        Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                            sender.send(Event::Key(key))
                        }
                        Ok(CrosstermEvent::Resize(w, h)) => sender.send(Event::Resize(w, h)),
                        Ok(_) => Ok(()),
                        Err(_) => return,
                    };
                    if forwarded.is_err() {
                        return;
                    }
                }
                if last_tick.elapsed() >= tick_rate {
                    if sender.send(Event::Tick).is_err() {
                        return;
                    }
                    last_tick = Instant::now();
                }
            }
        });
        Self { receiver }
    }

    /// Blocks until the next event.
    pub fn next(&self) -> Result<Event, RecvError> {
        self.receiver.recv()
    }
}
