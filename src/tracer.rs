// Copyright (C) 2025 FZI Forschungszentrum Informatik
// SPDX-License-Identifier: Apache-2.0
//! Trace building logic
//!
//! This module provides the [`Tracer`], which replays [`Token`]s against a
//! table of in-flight operations and generates streams of tracing [`Event`]s.

pub mod error;
pub mod event;
mod state;


pub use error::{Error, Unretired, Warning};
pub use event::{Event, Stage};

use crate::config::{self, Policy};
use crate::token::{CheckpointA, CheckpointB, Token};

/// Create a new [`Builder`] for [`Tracer`]s
pub fn builder() -> Builder {
    Builder::new()
}

/// Tracer
///
/// A tracer processes the [`Token`]s of a single probe capture in order and
/// generates [`Event`]s describing the lifetime of each operation.
///
/// Individual [`Token`]s are fed to the tracer through
/// [`process_token`][Self::process_token]. After a token was fed to the
/// tracer, [`Event`]s become availible via the tracer's [`Iterator`]
/// implementation. After all [`Event`]s were extracted, the next token may be
/// fed to the tracer. Feeding a token while the events generated from the
/// last token are not exhausted results in an error.
///
/// Hardware ids are only valid while an operation is in flight and are
/// reused afterwards. The tracer therefore assigns each issued operation a
/// fresh trace id, which is never reused.
///
/// Operations completing within a token are retired at the start of the next
/// token: the tracer emits a single-cycle advance followed by the
/// retirements and shortens that token's cycle delay by one.
///
/// # Example
///
/// ```
/// use probe_kanata::token::{CheckpointA, CheckpointB, Token};
/// use probe_kanata::tracer::{self, Event, Stage};
///
/// let mut tracer = tracer::builder().build();
///
/// let issue = CheckpointA { wen: false, addr: 0x10, channel: 2, id: 5 };
/// tracer
///     .process_token(&Token { cycle_delay: 1, checkpoint_a: Some(issue), checkpoint_b: None })
///     .unwrap();
/// assert_eq!(tracer.by_ref().count(), 4);
///
/// let complete = CheckpointB { id: 5 };
/// tracer
///     .process_token(&Token { cycle_delay: 3, checkpoint_a: None, checkpoint_b: Some(complete) })
///     .unwrap();
/// assert_eq!(tracer.next(), Some(Event::Cycle(3)));
/// assert_eq!(tracer.next(), Some(Event::Stage { id: 0, stage: Stage::ResponseReceived }));
/// assert_eq!(tracer.next(), None);
/// assert_eq!(tracer.pending_retire(), [0]);
/// ```
#[derive(Clone, Debug)]
pub struct Tracer {
    state: state::State,
    queue: state::Queue,
    orphan_completion: Policy,
}

impl Tracer {
    /// Process a [`Token`]
    ///
    /// On success, the tracer will yield the token's [`Event`]s. A completion
    /// without open issue is either reported as a [`Warning`] or as an
    /// [`Error::OrphanCompletion`], depending on the configured policy.
    ///
    /// The token is checked for protocol violations before any state is
    /// altered. If an error is returned, the tracer is left as it was before
    /// the call.
    pub fn process_token(&mut self, token: &Token) -> Result<Option<Warning>, Error> {
        if !self.queue.is_empty() {
            return Err(Error::UnprocessedEvents(self.queue.len()));
        }
        let warning = self.check(token)?;

        let mut delay = u64::from(token.cycle_delay);
        if !self.state.pending.is_empty() {
            self.advance(1);
            for id in self.state.pending.as_slice() {
                self.queue.push(Event::Retire { id: *id });
            }
            self.state.pending.clear();
            delay = delay.saturating_sub(1);
        }
        self.advance(delay);

        if let Some(issue) = token.checkpoint_a {
            self.issue(issue);
        }
        if let Some(completion) = token.checkpoint_b {
            self.complete(completion);
        }

        self.state.tokens += 1;
        Ok(warning)
    }

    /// Report operations left unretired
    ///
    /// After the last token was processed, this fn reports reads still awaiting
    /// their response and operations whose retirement was not yet emitted.
    /// Returns `None` if there are no such operations.
    pub fn finish(&self) -> Option<Unretired> {
        let summary = Unretired {
            in_flight: self.state.in_flight.len(),
            pending_retire: self.state.pending.len(),
        };
        (summary.in_flight > 0 || summary.pending_retire > 0).then_some(summary)
    }

    /// Retrieve the absolute cycle reconstructed so far
    pub fn current_cycle(&self) -> u64 {
        self.state.cycle
    }

    /// Retrieve the trace id that will be assigned to the next operation
    pub fn next_id(&self) -> u64 {
        self.state.next_id
    }

    /// Retrieve the number of tokens processed
    pub fn tokens_processed(&self) -> usize {
        self.state.tokens
    }

    /// Iterate over all in-flight operations as (hardware id, trace id) pairs
    pub fn in_flight(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.state.in_flight.iter()
    }

    /// Retrieve trace ids pending retirement, in order of completion
    pub fn pending_retire(&self) -> &[u64] {
        self.state.pending.as_slice()
    }

    /// Check a token for protocol violations
    fn check(&self, token: &Token) -> Result<Option<Warning>, Error> {
        let header = token.header();
        if !header.is_valid() {
            return Err(Error::MalformedToken(header));
        }

        let in_flight = &self.state.in_flight;
        let mut issued_read = None;
        if let Some(issue) = token.checkpoint_a {
            check_id(issue.id)?;
            if !issue.wen {
                if let Some(trace_id) = in_flight.get(issue.id) {
                    return Err(Error::DuplicateInFlightId {
                        hw_id: issue.id,
                        trace_id,
                    });
                }
                issued_read = Some(issue.id);
            }
        }

        let Some(completion) = token.checkpoint_b else {
            return Ok(None);
        };
        check_id(completion.id)?;
        if in_flight.get(completion.id).is_some() || issued_read == Some(completion.id) {
            return Ok(None);
        }
        let hw_id = completion.id;
        match self.orphan_completion {
            Policy::Abort => Err(Error::OrphanCompletion { hw_id }),
            Policy::Report => Ok(Some(Warning::OrphanCompletion { hw_id })),
        }
    }

    /// Advance time by the given number of cycles
    fn advance(&mut self, cycles: u64) {
        self.queue.push(Event::Cycle(cycles));
        self.state.cycle += cycles;
    }

    /// Issue an operation
    fn issue(&mut self, issue: CheckpointA) {
        let id = self.state.allocate();
        self.queue.push(Event::Issue {
            id,
            hw_id: issue.id,
            channel: issue.channel,
        });
        self.queue.push(Event::Label {
            id,
            addr: issue.addr,
            channel: issue.channel,
            wen: issue.wen,
        });
        if issue.wen {
            // Writes are acknowledged right away
            self.queue.push(Event::Stage {
                id,
                stage: Stage::WriteComplete,
            });
            self.state.pending.push(id);
        } else {
            self.queue.push(Event::Stage {
                id,
                stage: Stage::ReadIssued,
            });
            self.state.in_flight.insert(issue.id, id);
        }
    }

    /// Complete an operation, if it is in flight
    fn complete(&mut self, completion: CheckpointB) {
        if let Some(id) = self.state.in_flight.remove(completion.id) {
            self.queue.push(Event::Stage {
                id,
                stage: Stage::ResponseReceived,
            });
            self.state.pending.push(id);
        }
    }
}

impl Iterator for Tracer {
    type Item = Event;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.queue.len();
        (len, Some(len))
    }
}

impl ExactSizeIterator for Tracer {}

/// Builder for [`Tracer`]s
#[derive(Copy, Clone, Debug)]
pub struct Builder {
    orphan_completion: Policy,
}

impl Builder {
    /// Create a new builder for a [`Tracer`]
    pub fn new() -> Self {
        Default::default()
    }

    /// Build the [`Tracer`] for the given [`config::Parameters`]
    ///
    /// New builders assume [`Default`] parameters.
    pub fn with_params(self, params: &config::Parameters) -> Self {
        Self {
            orphan_completion: params.orphan_completion,
        }
    }

    /// Build a [`Tracer`] with the given policy for orphan completions
    pub fn with_orphan_completion(self, policy: Policy) -> Self {
        Self {
            orphan_completion: policy,
        }
    }

    /// Build the [`Tracer`]
    pub fn build(self) -> Tracer {
        Tracer {
            state: Default::default(),
            queue: Default::default(),
            orphan_completion: self.orphan_completion,
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            orphan_completion: config::PARAMETERS.orphan_completion,
        }
    }
}

/// Ensure the given hardware id fits the id space
fn check_id(id: u8) -> Result<(), Error> {
    if usize::from(id) < state::HW_IDS {
        Ok(())
    } else {
        Err(Error::IdOutOfRange(id))
    }
}
