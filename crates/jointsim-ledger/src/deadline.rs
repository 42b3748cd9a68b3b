use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use jointsim_core::units::Amount;
use jointsim_core::{Fault, LedgerGateway, UserId};
use log::warn;

#[derive(Debug)]
enum Request {
    Register(UserId, String),
    Open(UserId, UserId, Amount),
    Pay(UserId, UserId, Amount),
}

/// A ledger wrapper that bounds every call with a timeout.
///
/// The wrapped ledger runs on a dedicated thread. A call that is not answered before the timeout
/// fails with [`Fault::Timeout`]; its reply is discarded whenever it arrives. A ledger that has
/// gone away (for example because it panicked) surfaces as [`Fault::Disconnected`].
#[derive(Debug)]
pub struct DeadlineLedger<L> {
    requests: Sender<(u64, Request)>,
    replies: Receiver<(u64, Result<(), Fault>)>,
    worker: JoinHandle<L>,
    timeout: Duration,
    seq: u64,
}

impl<L> DeadlineLedger<L>
where
    L: LedgerGateway + Send + 'static,
{
    /// Moves `ledger` onto a new thread and returns a handle to it.
    pub fn spawn(ledger: L, timeout: Duration) -> std::io::Result<Self> {
        let (requests, rx) = crossbeam_channel::unbounded();
        let (tx, replies) = crossbeam_channel::unbounded();
        let worker = thread::Builder::new()
            .name("ledger".into())
            .spawn(move || serve(ledger, rx, tx))?;
        Ok(Self {
            requests,
            replies,
            worker,
            timeout,
            seq: 0,
        })
    }

    /// Stops the worker thread and returns the wrapped ledger. Waits for any call still in
    /// progress.
    pub fn into_inner(self) -> Result<L, Fault> {
        let Self {
            requests, worker, ..
        } = self;
        drop(requests);
        worker.join().map_err(|_| Fault::Disconnected)
    }

    /// The timeout applied to every call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn call(&mut self, request: Request) -> Result<(), Fault> {
        self.seq += 1;
        let seq = self.seq;
        self.requests
            .send((seq, request))
            .map_err(|_| Fault::Disconnected)?;
        let deadline = Instant::now() + self.timeout;
        loop {
            match self.replies.recv_deadline(deadline) {
                Ok((s, reply)) if s == seq => return reply,
                // Late reply to a call that already timed out.
                Ok(_) => continue,
                Err(RecvTimeoutError::Timeout) => {
                    warn!("Ledger call {seq} timed out after {:?}", self.timeout);
                    return Err(Fault::Timeout(self.timeout));
                }
                Err(RecvTimeoutError::Disconnected) => return Err(Fault::Disconnected),
            }
        }
    }
}

fn serve<L: LedgerGateway>(
    mut ledger: L,
    requests: Receiver<(u64, Request)>,
    replies: Sender<(u64, Result<(), Fault>)>,
) -> L {
    for (seq, request) in requests.iter() {
        let reply = match request {
            Request::Register(id, label) => ledger.register_user(id, &label),
            Request::Open(a, b, funding) => ledger.open_relationship(a, b, funding),
            Request::Pay(payer, payee, amount) => ledger.pay(payer, payee, amount),
        };
        if replies.send((seq, reply)).is_err() {
            break;
        }
    }
    ledger
}

impl<L> LedgerGateway for DeadlineLedger<L>
where
    L: LedgerGateway + Send + 'static,
{
    fn register_user(&mut self, id: UserId, label: &str) -> Result<(), Fault> {
        self.call(Request::Register(id, label.to_owned()))
    }

    fn open_relationship(&mut self, a: UserId, b: UserId, funding: Amount) -> Result<(), Fault> {
        self.call(Request::Open(a, b, funding))
    }

    fn pay(&mut self, payer: UserId, payee: UserId, amount: Amount) -> Result<(), Fault> {
        self.call(Request::Pay(payer, payee, amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryLedger;

    const TIMEOUT: Duration = Duration::from_millis(100);

    fn id(i: usize) -> UserId {
        UserId::new(i)
    }

    /// Delays every payment.
    #[derive(Debug)]
    struct SlowLedger {
        inner: MemoryLedger,
        delay: Duration,
    }

    impl LedgerGateway for SlowLedger {
        fn register_user(&mut self, id: UserId, label: &str) -> Result<(), Fault> {
            self.inner.register_user(id, label)
        }

        fn open_relationship(
            &mut self,
            a: UserId,
            b: UserId,
            funding: Amount,
        ) -> Result<(), Fault> {
            self.inner.open_relationship(a, b, funding)
        }

        fn pay(&mut self, payer: UserId, payee: UserId, amount: Amount) -> Result<(), Fault> {
            thread::sleep(self.delay);
            self.inner.pay(payer, payee, amount)
        }
    }

    /// Panics on every payment.
    #[derive(Debug)]
    struct BrokenLedger;

    impl LedgerGateway for BrokenLedger {
        fn register_user(&mut self, _id: UserId, _label: &str) -> Result<(), Fault> {
            Ok(())
        }

        fn open_relationship(&mut self, _: UserId, _: UserId, _: Amount) -> Result<(), Fault> {
            Ok(())
        }

        fn pay(&mut self, _: UserId, _: UserId, _: Amount) -> Result<(), Fault> {
            panic!("ledger crashed");
        }
    }

    #[test]
    fn forwards_calls_and_faults() -> anyhow::Result<()> {
        let mut ledger = DeadlineLedger::spawn(MemoryLedger::new(), Duration::from_secs(5))?;
        ledger.register_user(id(0), "User0")?;
        ledger.register_user(id(1), "User1")?;
        ledger.open_relationship(id(0), id(1), Amount::new(10))?;
        ledger.pay(id(0), id(1), Amount::new(3))?;
        assert_eq!(
            ledger.register_user(id(0), "User0"),
            Err(Fault::AlreadyRegistered(id(0)))
        );
        let inner = ledger.into_inner()?;
        let account = inner.account(id(0), id(1)).copied();
        assert_eq!(account.map(|a| a.balance_b), Some(Amount::new(8)));
        Ok(())
    }

    #[test]
    fn slow_call_times_out_and_late_reply_is_discarded() -> anyhow::Result<()> {
        let slow = SlowLedger {
            inner: MemoryLedger::new(),
            delay: Duration::from_millis(300),
        };
        let mut ledger = DeadlineLedger::spawn(slow, TIMEOUT)?;
        ledger.register_user(id(0), "User0")?;
        ledger.register_user(id(1), "User1")?;
        assert_eq!(
            ledger.pay(id(0), id(1), Amount::ONE),
            Err(Fault::Timeout(TIMEOUT))
        );
        // Let the worker finish the payment so its reply is queued.
        thread::sleep(Duration::from_millis(400));
        assert_eq!(
            ledger.register_user(id(1), "User1"),
            Err(Fault::AlreadyRegistered(id(1)))
        );
        ledger.register_user(id(2), "User2")?;
        assert_eq!(ledger.into_inner()?.inner.nr_users(), 3);
        Ok(())
    }

    #[test]
    fn crashed_ledger_is_disconnected() -> anyhow::Result<()> {
        let mut ledger = DeadlineLedger::spawn(BrokenLedger, TIMEOUT)?;
        ledger.register_user(id(0), "User0")?;
        assert_eq!(
            ledger.pay(id(0), id(1), Amount::ONE),
            Err(Fault::Disconnected)
        );
        assert_eq!(
            ledger.register_user(id(1), "User1"),
            Err(Fault::Disconnected)
        );
        assert!(ledger.into_inner().is_err());
        Ok(())
    }
}
