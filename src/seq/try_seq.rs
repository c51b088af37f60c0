use std::any::type_name;

use crate::{
    poll::Poll,
    promise::Promise,
    ready,
    result::Fallible,
    snapshot::{PromiseSnapshot, SeqStep},
};

/// Run `prior` to completion, then build the next step from its success value.
///
/// If `prior` fails, `next` is never called and the failure is handed back, re-encoded into
/// the result type of the next step. Chains of any length are built by nesting, which is
/// what [`try_seq!`](crate::try_seq!) and [`Promise::try_then`] do.
///
/// Every step may change the value type. Raw steps that cannot fail return
/// `Result<T, Infallible>` and mix freely with fallible ones.
///
/// # Examples
///
/// ```
/// use tryseq::prelude::*;
///
/// let mut p = try_seq(Poll::Ready(Ok::<_, Status>(42)), |v: i32| {
///     Poll::Ready(Ok::<_, Status>(v.to_string()))
/// });
/// assert_eq!(p.poll(), Poll::Ready(Ok("42".to_string())));
///
/// let mut failed = try_seq(Poll::Ready(Err::<i32, _>(Status::cancelled("stop"))), |v: i32| {
///     Poll::Ready(Ok::<_, Status>(v + 1))
/// });
/// assert_eq!(failed.poll(), Poll::Ready(Err(Status::cancelled("stop"))));
/// ```
pub fn try_seq<P, F, N>(prior: P, next: F) -> TrySeq<P, F, N>
where
    P: Promise,
    P::Output: Fallible,
    F: FnOnce(<P::Output as Fallible>::Value) -> N,
    N: Promise,
    N::Output: Fallible,
    <N::Output as Fallible>::Failure: From<<P::Output as Fallible>::Failure>,
{
    TrySeq {
        state: State::Prior { prior, next },
    }
}

/// Two-step fallible sequence; nested to form longer chains.
///
/// Created via [`try_seq`]. The prior step is dropped as soon as it completes.
pub struct TrySeq<P, F, N> {
    state: State<P, F, N>,
}

enum State<P, F, N> {
    /// The prior promise (a single step or a nested chain) is running.
    Prior { prior: P, next: F },
    /// The prior finished successfully and its successor is running.
    Next(N),
    Done,
}

impl<P, F, N> Promise for TrySeq<P, F, N>
where
    P: Promise,
    P::Output: Fallible,
    F: FnOnce(<P::Output as Fallible>::Value) -> N,
    N: Promise,
    N::Output: Fallible,
    <N::Output as Fallible>::Failure: From<<P::Output as Fallible>::Failure>,
{
    type Output = N::Output;

    fn poll(&mut self) -> Poll<Self::Output> {
        loop {
            match &mut self.state {
                State::Prior { prior, .. } => match ready!(prior.poll()).into_result() {
                    Ok(value) => {
                        let State::Prior { next, .. } =
                            std::mem::replace(&mut self.state, State::Done)
                        else {
                            unreachable!()
                        };
                        tracing::trace!(step = type_name::<F>(), "try_seq: starting next step");
                        self.state = State::Next(next(value));
                    }
                    Err(failure) => {
                        self.state = State::Done;
                        tracing::trace!(skipped = type_name::<F>(), "try_seq: short-circuit");
                        return Poll::Ready(N::Output::rethrow(failure));
                    }
                },
                State::Next(next) => {
                    let output = ready!(next.poll());
                    self.state = State::Done;
                    return Poll::Ready(output);
                }
                State::Done => panic!("`TrySeq` polled after completion"),
            }
        }
    }

    fn snapshot(&self) -> PromiseSnapshot {
        let mut steps = Vec::new();
        self.snapshot_steps(&mut steps);
        PromiseSnapshot::Seq { steps }
    }

    fn snapshot_steps(&self, steps: &mut Vec<SeqStep>) {
        match &self.state {
            State::Prior { prior, .. } => {
                prior.snapshot_steps(steps);
                steps.push(SeqStep::idle(type_name::<F>()));
            }
            State::Next(next) => {
                P::step_layout(steps);
                steps.push(SeqStep::active(type_name::<F>(), next.snapshot()));
            }
            State::Done => Self::step_layout(steps),
        }
    }

    fn step_layout(steps: &mut Vec<SeqStep>) {
        P::step_layout(steps);
        steps.push(SeqStep::idle(type_name::<F>()));
    }
}

/// Build an N-step [`TrySeq`] chain from a first promise and N-1 step functions.
///
/// `try_seq!(a, f, g)` is `try_seq(try_seq(a, f), g)`.
///
/// ```
/// use tryseq::prelude::*;
///
/// let mut p = tryseq::try_seq!(
///     Poll::Ready(Ok::<_, Status>(1)),
///     |x: i32| Poll::Ready(Ok::<_, Status>(x + 1)),
///     |x: i32| Poll::Ready(Ok::<_, Status>(x * 10)),
/// );
/// assert_eq!(p.poll(), Poll::Ready(Ok(20)));
/// ```
#[macro_export]
macro_rules! try_seq {
    ($first:expr $(, $next:expr)* $(,)?) => {{
        let seq = $first;
        $( let seq = $crate::try_seq(seq, $next); )*
        seq
    }};
}

#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        convert::Infallible,
        fmt::Debug,
    };

    use super::*;
    use crate::{
        flag::{Failure, StatusFlag, ValueOrFailure},
        status::{Status, StatusOr},
    };

    /// The result encoding a test runs against.
    trait Encoding {
        type Fail: Debug + PartialEq + From<Infallible>;
        type Out<T>: Fallible<Value = T, Failure = Self::Fail>;
        type Unit: Fallible<Value = (), Failure = Self::Fail> + Debug + PartialEq;

        fn ok<T>(value: T) -> Self::Out<T>;
        fn fail<T>() -> Self::Out<T>;
        fn ok_status() -> Self::Unit;
    }

    struct Rich;
    struct Flag;

    impl Encoding for Rich {
        type Fail = Status;
        type Out<T> = StatusOr<T>;
        type Unit = Status;

        fn ok<T>(value: T) -> StatusOr<T> {
            Ok(value)
        }
        fn fail<T>() -> StatusOr<T> {
            Err(Status::unknown(""))
        }
        fn ok_status() -> Status {
            Status::ok()
        }
    }

    impl Encoding for Flag {
        type Fail = Failure;
        type Out<T> = ValueOrFailure<T>;
        type Unit = StatusFlag;

        fn ok<T>(value: T) -> ValueOrFailure<T> {
            ValueOrFailure::Value(value)
        }
        fn fail<T>() -> ValueOrFailure<T> {
            ValueOrFailure::Failure
        }
        fn ok_status() -> StatusFlag {
            StatusFlag::new(true)
        }
    }

    fn ready_value<R: Fallible>(poll: Poll<R>) -> Result<R::Value, R::Failure> {
        poll.expect_ready("chain should have completed").into_result()
    }

    fn succeed_and_then<E: Encoding>() {
        let order = RefCell::new(String::new());
        let mut p = try_seq(Poll::Ready(E::ok(1)), |i: i32| {
            order.borrow_mut().push('1');
            Poll::Ready(E::ok(i + 1))
        });

        assert_eq!(ready_value(p.poll()).ok(), Some(2));
        assert_eq!(*order.borrow(), "1");
    }

    fn succeed_and_then_change_type<E: Encoding>() {
        let order = RefCell::new(String::new());
        let mut p = try_seq(Poll::Ready(E::ok(42)), |i: i32| {
            order.borrow_mut().push('1');
            Poll::Ready(E::ok(i.to_string()))
        });

        assert_eq!(ready_value(p.poll()).ok(), Some("42".to_string()));
        assert_eq!(*order.borrow(), "1");
    }

    fn fail_and_then<E: Encoding>() {
        let order = RefCell::new(String::new());
        let mut p = try_seq(Poll::Ready(E::fail::<i32>()), |_: i32| {
            order.borrow_mut().push('1');
            || -> Poll<E::Out<f64>> { panic!("step after a failure must not run") }
        });

        let out = ready_value(p.poll());
        assert!(out.is_err());
        assert_eq!(*order.borrow(), "");
    }

    fn raw_succeed_and_then<E: Encoding>() {
        let order = RefCell::new(String::new());
        let mut p = try_seq(Poll::Ready(E::ok_status()), |()| {
            order.borrow_mut().push('1');
            Poll::Ready(E::ok_status())
        });

        assert_eq!(p.poll(), Poll::Ready(E::ok_status()));
        assert_eq!(*order.borrow(), "1");
    }

    fn succeed_directly_and_then_directly<E: Encoding>() {
        let order = RefCell::new(String::new());
        let mut p = try_seq(
            || {
                order.borrow_mut().push('1');
                Poll::Ready(Ok::<i32, Infallible>(1))
            },
            |i: i32| {
                order.borrow_mut().push('2');
                let order = &order;
                move || {
                    order.borrow_mut().push('3');
                    Poll::Ready(E::ok(i + 1))
                }
            },
        );

        assert_eq!(ready_value(p.poll()).ok(), Some(2));
        assert_eq!(*order.borrow(), "123");
    }

    macro_rules! encoding_tests {
        ($($module:ident => $encoding:ty),* $(,)?) => {$(
            mod $module {
                use super::*;

                #[test]
                fn test_succeed_and_then() {
                    succeed_and_then::<$encoding>();
                }

                #[test]
                fn test_succeed_and_then_change_type() {
                    succeed_and_then_change_type::<$encoding>();
                }

                #[test]
                fn test_fail_and_then() {
                    fail_and_then::<$encoding>();
                }

                #[test]
                fn test_raw_succeed_and_then() {
                    raw_succeed_and_then::<$encoding>();
                }

                #[test]
                fn test_succeed_directly_and_then_directly() {
                    succeed_directly_and_then_directly::<$encoding>();
                }
            }
        )*};
    }

    encoding_tests! {
        rich => Rich,
        flag => Flag,
    }

    #[test]
    fn test_three_typed_pending_thens() {
        #[derive(Debug)]
        struct A(i32);
        #[derive(Debug)]
        struct B(i32);
        #[derive(Debug)]
        struct C(i32);
        #[derive(Debug)]
        struct D(i32);

        let order = &RefCell::new(String::new());
        let log = move |s: &str| order.borrow_mut().push_str(s);
        let pending_a = &Cell::new(true);
        let pending_b = &Cell::new(true);
        let pending_c = &Cell::new(true);
        let pending_d = &Cell::new(true);

        let initial = || -> Poll<Result<A, Infallible>> {
            log("0");
            if pending_a.get() {
                log("P");
                return Poll::Pending;
            }
            log("a");
            Poll::Ready(Ok(A(100)))
        };
        let next1 = |a: A| {
            log("1");
            move || -> Poll<Result<B, Infallible>> {
                assert_eq!(a.0, 100);
                if pending_b.get() {
                    log("P");
                    return Poll::Pending;
                }
                log("b");
                Poll::Ready(Ok(B(200)))
            }
        };
        let next2 = |b: B| {
            log("2");
            move || -> Poll<StatusOr<C>> {
                assert_eq!(b.0, 200);
                if pending_c.get() {
                    log("P");
                    return Poll::Pending;
                }
                log("Fail");
                Poll::Ready(Err(Status::unknown("")))
            }
        };
        let next3 = |c: C| {
            log("3");
            move || -> Poll<StatusOr<D>> {
                assert_eq!(c.0, 300);
                if pending_d.get() {
                    log("P");
                    return Poll::Pending;
                }
                log("d");
                Poll::Ready(Ok(D(400)))
            }
        };

        let mut seq = crate::try_seq!(initial, next1, next2, next3);
        let mut poll_and_take = || {
            let retval = seq.poll();
            (retval, std::mem::take(&mut *order.borrow_mut()))
        };

        let (retval, trace) = poll_and_take();
        assert!(retval.is_pending());
        assert_eq!(trace, "0P");

        pending_a.set(false);
        let (retval, trace) = poll_and_take();
        assert!(retval.is_pending());
        assert_eq!(trace, "0a1P");

        pending_b.set(false);
        let (retval, trace) = poll_and_take();
        assert!(retval.is_pending());
        assert_eq!(trace, "b2P");

        pending_c.set(false);
        let (retval, trace) = poll_and_take();
        assert!(matches!(retval, Poll::Ready(Err(_))));
        assert_eq!(trace, "Fail");
    }

    #[test]
    fn test_raw_fail_and_then() {
        let order = RefCell::new(String::new());
        let mut p = try_seq(
            || {
                order.borrow_mut().push('1');
                Poll::Ready(Status::cancelled(""))
            },
            |()| {
                order.borrow_mut().push('2');
                || -> Poll<Status> { panic!("step after a failure must not run") }
            },
        );

        assert_eq!(p.poll(), Poll::Ready(Status::cancelled("")));
        assert_eq!(*order.borrow(), "1");
    }

    #[test]
    fn test_raw_succeed_and_then_value() {
        let order = RefCell::new(String::new());
        let mut p = try_seq(
            || {
                order.borrow_mut().push('1');
                Poll::Ready(Status::ok())
            },
            |()| {
                order.borrow_mut().push('2');
                let order = &order;
                move || {
                    order.borrow_mut().push('3');
                    Poll::Ready(StatusOr::Ok(42))
                }
            },
        );

        assert_eq!(p.poll(), Poll::Ready(Ok(42)));
        assert_eq!(*order.borrow(), "123");
    }

    #[test]
    fn test_failure_converts_between_encodings() {
        let mut p = try_seq(Poll::Ready(ValueOrFailure::<u8>::Failure), |v: u8| {
            Poll::Ready(StatusOr::Ok(u32::from(v)))
        });
        let out = p.poll().unwrap_ready();
        assert_eq!(out.map_err(|s| s.code()), Err(crate::status::Code::Cancelled));
    }

    #[test]
    fn test_pending_step_is_not_rebuilt() {
        let built = Cell::new(0);
        let polled = Cell::new(0);
        let mut p = try_seq(Poll::Ready(StatusOr::Ok(())), |()| {
            built.set(built.get() + 1);
            || {
                polled.set(polled.get() + 1);
                if polled.get() < 3 {
                    Poll::Pending
                } else {
                    Poll::Ready(StatusOr::Ok("done"))
                }
            }
        });

        assert!(p.poll().is_pending());
        assert!(p.poll().is_pending());
        assert_eq!(p.poll(), Poll::Ready(Ok("done")));
        assert_eq!(built.get(), 1);
        assert_eq!(polled.get(), 3);
    }

    #[test]
    #[should_panic(expected = "`TrySeq` polled after completion")]
    fn test_poll_after_completion_panics() {
        let mut p = try_seq(Poll::Ready(StatusOr::Ok(1)), |v: i32| {
            Poll::Ready(StatusOr::Ok(v))
        });
        let _ = p.poll();
        let _ = p.poll();
    }

    #[test]
    fn test_dropping_mid_chain_releases_active_step() {
        use std::rc::Rc;

        let resource = Rc::new(());
        let held = Rc::clone(&resource);
        let mut p = try_seq(Poll::Ready(StatusOr::Ok(())), move |()| {
            move || {
                let _keep = &held;
                Poll::<StatusOr<()>>::Pending
            }
        });

        assert!(p.poll().is_pending());
        assert_eq!(Rc::strong_count(&resource), 2);
        drop(p);
        assert_eq!(Rc::strong_count(&resource), 1);
    }

    #[test]
    fn test_snapshot_tracks_active_step() {
        fn pending_once<T>(value: T) -> impl FnMut() -> Poll<StatusOr<T>> {
            let mut value = Some(value);
            let mut polled = false;
            move || {
                if !std::mem::replace(&mut polled, true) {
                    return Poll::Pending;
                }
                match value.take() {
                    Some(v) => Poll::Ready(Ok(v)),
                    None => panic!("polled after ready"),
                }
            }
        }

        let mut seq = crate::try_seq!(
            || Poll::Ready(StatusOr::Ok(42)),
            |i: i32| pending_once(i + 1),
            |i: i32| pending_once(i),
        );

        let snap = seq.snapshot();
        assert_eq!(snap.steps().map(<[SeqStep]>::len), Some(3));
        assert_eq!(snap.active_step(), Some(0));

        assert!(seq.poll().is_pending());
        let snap = seq.snapshot();
        assert_eq!(snap.steps().map(<[SeqStep]>::len), Some(3));
        assert_eq!(snap.active_step(), Some(1));

        assert!(seq.poll().is_pending());
        let snap = seq.snapshot();
        assert_eq!(snap.steps().map(<[SeqStep]>::len), Some(3));
        assert_eq!(snap.active_step(), Some(2));

        assert_eq!(seq.poll(), Poll::Ready(Ok(43)));
        let snap = seq.snapshot();
        assert_eq!(snap.steps().map(<[SeqStep]>::len), Some(3));
        assert_eq!(snap.active_step(), None);
    }

    #[test]
    fn test_snapshot_does_not_advance() {
        let polls = Cell::new(0);
        let seq = try_seq(
            || {
                polls.set(polls.get() + 1);
                Poll::Ready(StatusOr::Ok(1))
            },
            |i: i32| Poll::Ready(StatusOr::Ok(i)),
        );

        let mut buffer = Vec::new();
        seq.snapshot_steps(&mut buffer);
        seq.snapshot_steps(&mut buffer);
        assert_eq!(buffer.len(), 4);
        assert_eq!(polls.get(), 0);
    }
}
