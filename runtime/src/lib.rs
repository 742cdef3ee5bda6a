//! Provides the bytecode model for compiled patterns and a Pike-style virtual
//! machine that evaluates every live alternative of a program in lock-step,
//! one input character at a time.
//!
//! # Example
//!
//! ```
//! use regex_runtime::*;
//!
//! // approximate to `(a)b`
//! let prog = Program::default().with_num_slots(2).with_opcodes(vec![
//!     Opcode::Save(InstSave::new(0)),
//!     Opcode::Consume(InstConsume::new('a')),
//!     Opcode::Save(InstSave::new(1)),
//!     Opcode::Consume(InstConsume::new('b')),
//!     Opcode::Match,
//! ]);
//!
//! let threads = start(&prog, 0);
//! let threads = step(&prog, &threads, 'a', 0).threads;
//! let step = step(&prog, &threads, 'b', 1);
//!
//! // the match thread is only reported once it is stepped past.
//! assert!(step.matched.is_none());
//! assert_eq!(1, step.threads.len());
//! ```
use std::fmt::Display;

mod captures;
pub mod matcher;
mod sparse_set;

pub use captures::Captures;
use sparse_set::SparseSet;

/// A simulation cursor, pairing a program position with the capture slots
/// recorded on the way there.
#[derive(Debug, Clone)]
pub struct Thread {
    inst: InstIndex,
    captures: Captures,
}

impl Thread {
    pub fn new(inst: InstIndex, captures: Captures) -> Self {
        Self { inst, captures }
    }

    /// The instruction this thread is waiting on.
    pub fn inst(&self) -> InstIndex {
        self.inst
    }

    pub fn captures(&self) -> &Captures {
        &self.captures
    }
}

/// The set of live threads at a single input offset, deduplicated by
/// instruction and ordered by priority.
#[derive(Debug)]
pub struct Threads {
    gen: SparseSet,
    threads: Vec<Thread>,
}

impl Threads {
    pub fn with_set_size(set_capacity: usize) -> Self {
        Self {
            gen: SparseSet::new(set_capacity),
            threads: vec![],
        }
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Thread> {
        self.threads.iter()
    }
}

impl Default for Threads {
    fn default() -> Self {
        Self::with_set_size(0)
    }
}

impl AsRef<[Thread]> for Threads {
    fn as_ref(&self) -> &[Thread] {
        &self.threads
    }
}

/// A compiled pattern. Instruction positions double as jump targets and the
/// program is never modified once built.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Program {
    num_slots: usize,
    program: Vec<Instruction>,
}

impl Program {
    #[must_use]
    pub fn new(num_slots: usize, program: Vec<Opcode>) -> Self {
        Self::default()
            .with_num_slots(num_slots)
            .with_opcodes(program)
    }

    pub fn with_opcodes(self, program: Vec<Opcode>) -> Self {
        Self {
            num_slots: self.num_slots,
            program: program
                .into_iter()
                .enumerate()
                .map(|(id, opcode)| Instruction::new(id, opcode))
                .collect(),
        }
    }

    pub fn with_num_slots(self, num_slots: usize) -> Self {
        Self {
            num_slots,
            program: self.program,
        }
    }

    /// The number of capture slots, two per capturing group.
    pub fn num_slots(&self) -> usize {
        self.num_slots
    }

    pub fn get(&self, index: InstIndex) -> Option<&Opcode> {
        self.program.get(index.as_usize()).map(|inst| &inst.opcode)
    }

    pub fn len(&self) -> usize {
        self.program.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for inst in self.program.iter() {
            writeln!(f, "{}", inst)?
        }

        Ok(())
    }
}

impl std::ops::Index<InstIndex> for Program {
    type Output = Opcode;

    fn index(&self, index: InstIndex) -> &Self::Output {
        let idx = index.as_usize();
        &self.program[idx].opcode
    }
}

impl AsRef<[Instruction]> for Program {
    fn as_ref(&self) -> &[Instruction] {
        &self.program
    }
}

#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstIndex(u32);

impl InstIndex {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for InstIndex {
    fn from(ptr: u32) -> Self {
        Self(ptr)
    }
}

impl std::ops::Add<u32> for InstIndex {
    type Output = Self;

    fn add(self, rhs: u32) -> Self::Output {
        InstIndex::from(self.0 + rhs)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    id: usize,
    opcode: Opcode,
}

impl Instruction {
    #[must_use]
    pub fn new(id: usize, opcode: Opcode) -> Self {
        Self { id, opcode }
    }

    pub fn opcode(&self) -> &Opcode {
        &self.opcode
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}: {}", self.id, self.opcode)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Opcode {
    Any,
    Consume(InstConsume),
    Split(InstSplit),
    Jmp(InstJmp),
    Save(InstSave),
    Match,
}

impl Opcode {
    /// Returns `true` for instructions that advance the input.
    pub fn is_consuming(&self) -> bool {
        matches!(self, Opcode::Any | Opcode::Consume(_))
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Opcode::Match => Display::fmt(&InstMatch, f),
            Opcode::Consume(i) => Display::fmt(&i, f),
            Opcode::Split(i) => Display::fmt(&i, f),
            Opcode::Any => Display::fmt(&InstAny::new(), f),
            Opcode::Jmp(i) => Display::fmt(&i, f),
            Opcode::Save(i) => Display::fmt(&i, f),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct InstMatch;

impl Display for InstMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Match")
    }
}

#[derive(Debug, PartialEq)]
pub struct InstAny;

impl InstAny {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for InstAny {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for InstAny {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Any")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstConsume {
    value: char,
}

impl InstConsume {
    #[must_use]
    pub fn new(value: char) -> Self {
        Self { value }
    }
}

impl Display for InstConsume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Consume: {:?}", self.value)
    }
}

/// Forks execution into two branches without consuming input. The `x`
/// branch always has priority over the `y` branch.
#[derive(Debug, Clone, PartialEq)]
pub struct InstSplit {
    x_branch: InstIndex,
    y_branch: InstIndex,
}

impl InstSplit {
    #[must_use]
    pub fn new(x: InstIndex, y: InstIndex) -> Self {
        Self {
            x_branch: x,
            y_branch: y,
        }
    }
}

impl Display for InstSplit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Split: ({:04}), ({:04})",
            self.x_branch.as_u32(),
            self.y_branch.as_u32()
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstJmp {
    next: InstIndex,
}

impl InstJmp {
    pub fn new(next: InstIndex) -> Self {
        Self { next }
    }
}

impl Display for InstJmp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JumpAbs: ({:04})", self.next.as_u32())
    }
}

/// Records the current input offset into a capture slot.
#[derive(Debug, Clone, PartialEq)]
pub struct InstSave {
    slot_id: usize,
}

impl InstSave {
    #[must_use]
    pub fn new(slot_id: usize) -> Self {
        Self { slot_id }
    }
}

impl Display for InstSave {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Save[{:04}]", self.slot_id)
    }
}

/// Expands the epsilon-closure of `t` into `thread_list`.
///
/// Epsilon transitions are walked depth first on an explicit stack so that
/// looping programs never grow the call stack. The `y` branch of a split is
/// pushed before the `x` branch, which keeps threads in priority order.
fn add_thread(
    program: &Program,
    thread_list: &mut Threads,
    stack: &mut Vec<Thread>,
    t: Thread,
    sp: usize,
) {
    stack.push(t);

    while let Some(t) = stack.pop() {
        let inst_idx = t.inst;

        // Don't visit states we've already added, or states past the end of
        // the program.
        let opcode = match program.get(inst_idx) {
            Some(opcode) if thread_list.gen.insert(inst_idx.as_usize()) => opcode,
            _ => continue,
        };

        match opcode {
            Opcode::Split(InstSplit { x_branch, y_branch }) => {
                stack.push(Thread::new(*y_branch, t.captures.clone()));
                stack.push(Thread::new(*x_branch, t.captures));
            }
            Opcode::Jmp(InstJmp { next }) => stack.push(Thread::new(*next, t.captures)),
            Opcode::Save(InstSave { slot_id }) => {
                let captures = t.captures.save(*slot_id, sp);
                stack.push(Thread::new(inst_idx + 1, captures))
            }
            Opcode::Any | Opcode::Consume(_) | Opcode::Match => thread_list.threads.push(t),
        }
    }
}

/// Builds the initial thread set for a program at input offset `sp`.
pub fn start(program: &Program, sp: usize) -> Threads {
    let mut threads = Threads::with_set_size(program.len());

    add_thread(
        program,
        &mut threads,
        &mut vec![],
        Thread::new(InstIndex::from(0), Captures::default()),
        sp,
    );

    threads
}

/// The outcome of advancing a thread set by one character.
#[derive(Debug)]
pub struct Step {
    /// Threads live after consuming the character.
    pub threads: Threads,
    /// The highest priority thread that was sitting on a `Match`
    /// instruction before the character was consumed.
    pub matched: Option<Thread>,
}

/// Advances every thread in `threads` past `next_char`, which sits at input
/// offset `sp`.
pub fn step(program: &Program, threads: &Threads, next_char: char, sp: usize) -> Step {
    let mut next_thread_list = Threads::with_set_size(program.len());
    let mut stack = vec![];
    let mut matched = None;
    let next_sp = sp + next_char.len_utf8();

    for thread in threads.iter() {
        let default_next_inst_idx = thread.inst + 1;

        match program.get(thread.inst) {
            Some(Opcode::Consume(InstConsume { value })) if *value == next_char => add_thread(
                program,
                &mut next_thread_list,
                &mut stack,
                Thread::new(default_next_inst_idx, thread.captures.clone()),
                next_sp,
            ),
            Some(Opcode::Any) => add_thread(
                program,
                &mut next_thread_list,
                &mut stack,
                Thread::new(default_next_inst_idx, thread.captures.clone()),
                next_sp,
            ),
            Some(Opcode::Match) if matched.is_none() => matched = Some(thread.clone()),
            _ => continue,
        }
    }

    Step {
        threads: next_thread_list,
        matched,
    }
}
