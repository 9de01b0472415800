//! The conditional-inclusion state machine (spec.md §4.1 "State machine for
//! conditional inclusion"): a stack of frames tracking whether the current
//! nesting level is emitting tokens, has already emitted for this
//! `#if`/`#elif`/`#else` chain, or is dormant waiting for a later branch.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameState {
    Inactive,
    Active,
    AlreadyMatched,
}

#[derive(Default)]
pub struct ConditionalStack {
    frames: Vec<FrameState>,
}

impl ConditionalStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when every enclosing frame (and the top level, if the stack is
    /// empty) is emitting tokens.
    pub fn is_active(&self) -> bool {
        self.frames.iter().all(|f| *f == FrameState::Active)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    fn parent_active(&self) -> bool {
        let without_top = self.frames.len().saturating_sub(1);
        self.frames[..without_top].iter().all(|f| *f == FrameState::Active)
    }

    /// `#if`/`#ifdef`/`#ifndef`. `cond` is only meaningful if the enclosing
    /// context was already active; when it wasn't, the frame is pushed
    /// `Inactive` without evaluating `cond` at all, matching "tokens are
    /// dropped and only the directive skeleton is tracked."
    pub fn push_if(&mut self, cond: bool) {
        let parent_active = self.is_active();
        let state = if parent_active && cond {
            FrameState::Active
        } else {
            FrameState::Inactive
        };
        self.frames.push(state);
    }

    pub fn handle_elif(&mut self, cond: bool) -> Result<(), &'static str> {
        let parent_active = self.parent_active();
        let top = self
            .frames
            .last_mut()
            .ok_or("#elif without matching #if")?;
        *top = match *top {
            FrameState::Active => FrameState::AlreadyMatched,
            FrameState::Inactive if parent_active && cond => FrameState::Active,
            other => other,
        };
        Ok(())
    }

    pub fn handle_else(&mut self) -> Result<(), &'static str> {
        let parent_active = self.parent_active();
        let top = self.frames.last_mut().ok_or("#else without matching #if")?;
        *top = match *top {
            FrameState::Active => FrameState::Inactive,
            FrameState::Inactive if parent_active => FrameState::Active,
            other => other,
        };
        Ok(())
    }

    pub fn pop_endif(&mut self) -> Result<(), &'static str> {
        if self.frames.pop().is_none() {
            return Err("#endif without matching #if");
        }
        Ok(())
    }

    pub fn unterminated(&self) -> bool {
        !self.frames.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/conditional_tests.rs"]
mod conditional_tests;
