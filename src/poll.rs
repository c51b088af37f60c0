/// Result of polling a promise: either it still has work to do, or it is done with a value.
///
/// `Poll` is the return type of [`Promise::poll`](crate::Promise::poll). It is produced and
/// consumed within a single poll call and never stored by the combinators.
///
/// # Examples
///
/// ```rust
/// use tryseq::Poll;
///
/// let waiting: Poll<i32> = Poll::Pending;
/// let done: Poll<i32> = Poll::Ready(42);
///
/// assert!(waiting.is_pending());
/// assert_eq!(done.map(|x| x * 2), Poll::Ready(84));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Poll<T> {
    /// The promise has not finished yet; poll it again later.
    Pending,
    /// The promise finished with a value.
    Ready(T),
}

impl<T> Poll<T> {
    /// Returns `true` if the poll is `Pending`.
    #[inline]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Poll::Pending)
    }

    /// Returns `true` if the poll is `Ready`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tryseq::Poll;
    ///
    /// assert!(Poll::Ready(()).is_ready());
    /// assert!(!Poll::<()>::Pending.is_ready());
    /// ```
    #[inline]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Poll::Ready(_))
    }

    /// Converts from `Poll<T>` to `Option<T>`, discarding `Pending`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tryseq::Poll;
    ///
    /// assert_eq!(Poll::Ready(7).ready_value(), Some(7));
    /// assert_eq!(Poll::<i32>::Pending.ready_value(), None);
    /// ```
    #[inline]
    pub fn ready_value(self) -> Option<T> {
        match self {
            Poll::Pending => None,
            Poll::Ready(t) => Some(t),
        }
    }

    /// Maps a `Poll<T>` to `Poll<U>` by applying a function to the ready value.
    #[inline]
    pub fn map<U, F>(self, f: F) -> Poll<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Poll::Pending => Poll::Pending,
            Poll::Ready(t) => Poll::Ready(f(t)),
        }
    }

    /// Converts from `&Poll<T>` to `Poll<&T>`.
    #[inline]
    pub const fn as_ref(&self) -> Poll<&T> {
        match self {
            Poll::Pending => Poll::Pending,
            Poll::Ready(t) => Poll::Ready(t),
        }
    }

    /// Converts from `&mut Poll<T>` to `Poll<&mut T>`.
    #[inline]
    pub fn as_mut(&mut self) -> Poll<&mut T> {
        match self {
            Poll::Pending => Poll::Pending,
            Poll::Ready(t) => Poll::Ready(t),
        }
    }

    /// Takes the ready value out, leaving `Pending` in its place.
    ///
    /// This is what an immediate promise does when it is polled: the value is handed out
    /// once, and anything polling it afterwards sees `Pending`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tryseq::Poll;
    ///
    /// let mut p = Poll::Ready("done");
    /// assert_eq!(p.take(), Poll::Ready("done"));
    /// assert_eq!(p, Poll::Pending);
    /// ```
    #[inline]
    pub fn take(&mut self) -> Poll<T> {
        std::mem::replace(self, Poll::Pending)
    }

    /// Returns the ready value or a default.
    #[inline]
    pub fn ready_or(self, default: T) -> T {
        match self {
            Poll::Pending => default,
            Poll::Ready(t) => t,
        }
    }

    /// Returns the ready value, consuming `self`.
    ///
    /// # Panics
    ///
    /// Panics with `msg` if the poll is `Pending`.
    ///
    /// ```should_panic
    /// use tryseq::Poll;
    ///
    /// Poll::<i32>::Pending.expect_ready("still waiting"); // panics with "still waiting"
    /// ```
    #[inline]
    #[track_caller]
    pub fn expect_ready(self, msg: &str) -> T {
        match self {
            Poll::Pending => panic!("{}", msg),
            Poll::Ready(t) => t,
        }
    }

    /// Returns the ready value, consuming `self`.
    ///
    /// # Panics
    ///
    /// Panics if the poll is `Pending`.
    #[inline]
    #[track_caller]
    pub fn unwrap_ready(self) -> T {
        match self {
            Poll::Pending => panic!("called `Poll::unwrap_ready()` on a `Pending` value"),
            Poll::Ready(t) => t,
        }
    }
}

impl<T> From<std::task::Poll<T>> for Poll<T> {
    fn from(poll: std::task::Poll<T>) -> Self {
        match poll {
            std::task::Poll::Pending => Poll::Pending,
            std::task::Poll::Ready(t) => Poll::Ready(t),
        }
    }
}

impl<T> From<Poll<T>> for std::task::Poll<T> {
    fn from(poll: Poll<T>) -> Self {
        match poll {
            Poll::Pending => std::task::Poll::Pending,
            Poll::Ready(t) => std::task::Poll::Ready(t),
        }
    }
}

/// Returns early with `Poll::Pending` if the expression is pending, otherwise evaluates to the
/// ready value.
///
/// ```rust
/// use tryseq::{ready, Poll};
///
/// fn double(p: Poll<i32>) -> Poll<i32> {
///     let v = ready!(p);
///     Poll::Ready(v * 2)
/// }
///
/// assert_eq!(double(Poll::Ready(2)), Poll::Ready(4));
/// assert_eq!(double(Poll::Pending), Poll::Pending);
/// ```
#[macro_export]
macro_rules! ready {
    ($e:expr $(,)?) => {
        match $e {
            $crate::Poll::Ready(t) => t,
            $crate::Poll::Pending => return $crate::Poll::Pending,
        }
    };
}
