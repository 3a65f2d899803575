//! In-process transport: both participants share a pair of queues.
//!
//! Stands in for the real network in the demo binary and the protocol
//! tests. Delivery is ordered and at-most-once by construction, which is
//! exactly the guarantee the session layer assumes of its transport.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::session::wire::{ClientMessage, ServerMessage};
use crate::session::{CallTarget, ParticipantId, Session, Transport, AUTHORITY};

#[derive(Default)]
struct Queues {
    to_authority: VecDeque<(ParticipantId, ClientMessage)>,
    outbound: VecDeque<(CallTarget, ServerMessage)>,
}

/// The shared mailbox both endpoints write into.
#[derive(Clone, Default)]
pub struct LocalNet {
    shared: Rc<RefCell<Queues>>,
}

impl LocalNet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endpoint(&self, id: ParticipantId) -> LocalEndpoint {
        LocalEndpoint {
            id,
            shared: Rc::clone(&self.shared),
        }
    }
}

/// One participant's handle on the shared mailbox.
pub struct LocalEndpoint {
    id: ParticipantId,
    shared: Rc<RefCell<Queues>>,
}

impl Transport for LocalEndpoint {
    fn call(&mut self, target: CallTarget, msg: &ServerMessage) {
        self.shared
            .borrow_mut()
            .outbound
            .push_back((target, msg.clone()));
    }

    fn call_authority(&mut self, msg: &ClientMessage) {
        self.shared
            .borrow_mut()
            .to_authority
            .push_back((self.id, msg.clone()));
    }
}

/// Delivers queued calls until both mailboxes are empty. Client calls are
/// handled by the authority; broadcasts go to the replica (the authority
/// already applied its own); directed messages go to their addressee.
pub fn pump(
    net: &LocalNet,
    authority: &mut Session<LocalEndpoint>,
    replica: &mut Session<LocalEndpoint>,
) {
    loop {
        let client = net.shared.borrow_mut().to_authority.pop_front();
        if let Some((from, msg)) = client {
            // Rejections are reported back over the wire; here the return
            // value is redundant.
            let _ = authority.handle_client(from, msg);
            continue;
        }

        let out = net.shared.borrow_mut().outbound.pop_front();
        match out {
            Some((CallTarget::All, msg)) => replica.handle_server(&msg),
            Some((CallTarget::One(id), msg)) => {
                if id == AUTHORITY {
                    authority.handle_server(&msg);
                } else {
                    replica.handle_server(&msg);
                }
            }
            None => break,
        }
    }
}
