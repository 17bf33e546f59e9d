//! The pull-stream primitive that chains every pipeline stage together (§4.1,
//! §5).
//!
//! A [`Stream`] exposes one operation, [`Stream::advance`], which yields
//! exactly one of three outcomes — a value, end-of-stream, or a terminal
//! error — exactly once. This is the continuation-passing `advance(on_error,
//! on_end, on_value)` contract from the design, rendered the idiomatic Rust
//! way: the three continuations collapse into the three arms of [`Step`], so
//! callers `match` instead of passing three closures. Both renditions carry
//! the same guarantee; this one borrow-checks without a closure-capture
//! dance at every stage boundary.
//!
//! Streams are single-consumer. Splitting is done by explicit peek buffering
//! ([`Peekable`]), never by cloning a stream.

use crate::error::Error;

/// The result of one [`Stream::advance`] call.
#[derive(Debug)]
pub enum Step<T> {
    Value(T),
    End,
    Error(Error),
}

impl<T> Step<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Step<U> {
        match self {
            Step::Value(v) => Step::Value(f(v)),
            Step::End => Step::End,
            Step::Error(e) => Step::Error(e),
        }
    }
}

/// A pull-based source of `Item`s.
///
/// Implementors own their accumulators exclusively (§5: "no shared mutable
/// state across stages"). Once `advance` delivers [`Step::End`] it must keep
/// delivering `Step::End` forever (end-of-stream is sticky); once it delivers
/// [`Step::Error`] the stream must not be advanced past the error.
pub trait Stream {
    type Item;

    fn advance(&mut self) -> Step<Self::Item>;

    /// Look at the next item without consuming it.
    fn peekable(self) -> Peekable<Self>
    where
        Self: Sized,
    {
        Peekable {
            inner: self,
            buffered: None,
        }
    }

    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: FnMut(Self::Item) -> U,
    {
        Map { inner: self, f }
    }

    fn filter<F>(self, predicate: F) -> Filter<Self, F>
    where
        Self: Sized,
        F: FnMut(&Self::Item) -> bool,
    {
        Filter {
            inner: self,
            predicate,
        }
    }

    fn concat<S>(self, next: S) -> Concat<Self, S>
    where
        Self: Sized,
        S: Stream<Item = Self::Item>,
    {
        Concat {
            first: Some(self),
            second: next,
        }
    }

    /// Drain a finite stream into a `Vec`. For tests and small tooling only —
    /// defeats the whole point of streaming for anything large.
    fn to_vec(mut self) -> Result<Vec<Self::Item>, Error>
    where
        Self: Sized,
    {
        let mut out = Vec::new();
        loop {
            match self.advance() {
                Step::Value(v) => out.push(v),
                Step::End => return Ok(out),
                Step::Error(e) => return Err(e),
            }
        }
    }
}

/// A stream with one slot of look-ahead and the ability to push a
/// previously-observed value back onto the front (the tokenizer's
/// "reconsume").
pub struct Peekable<S: Stream> {
    inner: S,
    buffered: Option<Step<S::Item>>,
}

impl<S: Stream> Peekable<S> {
    pub fn peek(&mut self) -> &Step<S::Item> {
        if self.buffered.is_none() {
            self.buffered = Some(self.inner.advance());
        }
        self.buffered.as_ref().unwrap()
    }

    /// Insert a previously-observed value at the head of the stream. Panics
    /// if a value is already buffered — at most one code point of look-ahead
    /// is ever needed by the stages in this pipeline (§4.1).
    pub fn push_back(&mut self, item: S::Item) {
        assert!(
            self.buffered.is_none(),
            "push_back called with a value already buffered"
        );
        self.buffered = Some(Step::Value(item));
    }
}

impl<S: Stream> Stream for Peekable<S> {
    type Item = S::Item;

    fn advance(&mut self) -> Step<S::Item> {
        match self.buffered.take() {
            Some(step) => step,
            None => self.inner.advance(),
        }
    }
}

pub struct Map<S, F> {
    inner: S,
    f: F,
}

impl<S, U, F> Stream for Map<S, F>
where
    S: Stream,
    F: FnMut(S::Item) -> U,
{
    type Item = U;

    fn advance(&mut self) -> Step<U> {
        self.inner.advance().map(&mut self.f)
    }
}

pub struct Filter<S, F> {
    inner: S,
    predicate: F,
}

impl<S, F> Stream for Filter<S, F>
where
    S: Stream,
    F: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;

    fn advance(&mut self) -> Step<S::Item> {
        loop {
            match self.inner.advance() {
                Step::Value(v) => {
                    if (self.predicate)(&v) {
                        return Step::Value(v);
                    }
                }
                other => return other,
            }
        }
    }
}

pub struct Concat<A, B> {
    first: Option<A>,
    second: B,
}

impl<A, B> Stream for Concat<A, B>
where
    A: Stream,
    B: Stream<Item = A::Item>,
{
    type Item = A::Item;

    fn advance(&mut self) -> Step<A::Item> {
        if let Some(first) = self.first.as_mut() {
            match first.advance() {
                Step::Value(v) => return Step::Value(v),
                Step::Error(e) => return Step::Error(e),
                Step::End => self.first = None,
            }
        }
        self.second.advance()
    }
}

/// Wrap a plain producer callback as a stream. The callback returns `None` at
/// end-of-input, mirroring `from-function` in §4.1.
pub struct FromFn<F> {
    f: F,
    done: bool,
}

pub fn from_fn<T, F>(f: F) -> FromFn<F>
where
    F: FnMut() -> Result<Option<T>, Error>,
{
    FromFn { f, done: false }
}

impl<T, F> Stream for FromFn<F>
where
    F: FnMut() -> Result<Option<T>, Error>,
{
    type Item = T;

    fn advance(&mut self) -> Step<T> {
        if self.done {
            return Step::End;
        }
        match (self.f)() {
            Ok(Some(v)) => Step::Value(v),
            Ok(None) => {
                self.done = true;
                Step::End
            }
            Err(e) => {
                self.done = true;
                Step::Error(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec_stream(values: Vec<i32>) -> impl Stream<Item = i32> {
        let mut values = values.into_iter();
        from_fn(move || Ok(values.next()))
    }

    #[test]
    fn test_to_vec_drains_in_order() {
        let s = vec_stream(vec![1, 2, 3]);
        assert_eq!(s.to_vec().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_end_is_sticky() {
        let mut s = vec_stream(vec![1]);
        assert!(matches!(s.advance(), Step::Value(1)));
        assert!(matches!(s.advance(), Step::End));
        assert!(matches!(s.advance(), Step::End));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut s = vec_stream(vec![1, 2]).peekable();
        assert!(matches!(s.peek(), Step::Value(1)));
        assert!(matches!(s.peek(), Step::Value(1)));
        assert!(matches!(s.advance(), Step::Value(1)));
        assert!(matches!(s.advance(), Step::Value(2)));
    }

    #[test]
    fn test_push_back_reinserts_at_head() {
        let mut s = vec_stream(vec![1, 2]).peekable();
        assert!(matches!(s.advance(), Step::Value(1)));
        s.push_back(1);
        assert!(matches!(s.advance(), Step::Value(1)));
        assert!(matches!(s.advance(), Step::Value(2)));
    }

    #[test]
    fn test_map_and_filter_compose() {
        let s = vec_stream(vec![1, 2, 3, 4])
            .filter(|v| v % 2 == 0)
            .map(|v| v * 10);
        assert_eq!(s.to_vec().unwrap(), vec![20, 40]);
    }

    #[test]
    fn test_concat_runs_first_then_second() {
        let s = vec_stream(vec![1, 2]).concat(vec_stream(vec![3, 4]));
        assert_eq!(s.to_vec().unwrap(), vec![1, 2, 3, 4]);
    }
}
