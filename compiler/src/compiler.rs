//! Provides methods and types to facilitate the compilation of a parsed regex
//! ast into runtime bytecode.
//!
//! # Example
//!
//! ```
//! use regex_compiler::ast::*;
//! use regex_runtime::*;
//! use regex_compiler::compile;
//!
//! // approximate to `a*`
//! let regex_ast = Regex(Expression(vec![Factor::WithQuantifier {
//!     atom: Atom::Character(Char('a')),
//!     quantifier: Quantifier::ZeroOrMore,
//! }]));
//!
//! assert_eq!(
//!     Program::default().with_opcodes(vec![
//!         Opcode::Split(InstSplit::new(InstIndex::from(1), InstIndex::from(3))),
//!         Opcode::Consume(InstConsume::new('a')),
//!         Opcode::Jmp(InstJmp::new(InstIndex::from(0))),
//!         Opcode::Match,
//!     ]),
//!     compile(regex_ast)
//! )
//! ```
use super::ast;
use regex_runtime::*;

/// A internal representation of the `regex_runtime::Opcode` type, with
/// relative addressing.
///
/// Jump targets are stored as offsets from the instruction itself, so a
/// compiled block can be wrapped by a quantifier and shifted to a new
/// position without patching the targets inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RelativeOpcode {
    Any,
    Consume(char),
    Split(i32, i32),
    Jmp(i32),
    Save(usize),
    Match,
}

impl RelativeOpcode {
    fn into_opcode_with_index(self, idx: u32) -> Opcode {
        match self {
            RelativeOpcode::Any => Opcode::Any,
            RelativeOpcode::Consume(c) => Opcode::Consume(InstConsume::new(c)),
            RelativeOpcode::Split(rel_x, rel_y) => Opcode::Split(InstSplit::new(
                absolute(idx, rel_x),
                absolute(idx, rel_y),
            )),
            RelativeOpcode::Jmp(rel_jmp_to) => Opcode::Jmp(InstJmp::new(absolute(idx, rel_jmp_to))),
            RelativeOpcode::Save(slot) => Opcode::Save(InstSave::new(slot)),
            RelativeOpcode::Match => Opcode::Match,
        }
    }
}

fn absolute(idx: u32, offset: i32) -> InstIndex {
    InstIndex::from(idx.saturating_add_signed(offset))
}

type RelativeOpcodes = Vec<RelativeOpcode>;

/// Hands out capture slots to groups in the order their opening parenthesis
/// is encountered.
#[derive(Debug, Default)]
struct SlotAllocator {
    next_slot: usize,
}

impl SlotAllocator {
    /// Reserves the start and end slot for a new group.
    fn allocate_group(&mut self) -> (usize, usize) {
        let start = self.next_slot;
        self.next_slot += 2;
        (start, start + 1)
    }

    fn num_slots(&self) -> usize {
        self.next_slot
    }
}

/// Accepts a parsed AST and compiles it into a runnable bytecode program for
/// use with the regex-runtime crate.
pub fn compile(regex_ast: ast::Regex) -> Program {
    let ast::Regex(expr) = regex_ast;
    let mut slots = SlotAllocator::default();

    let opcodes = expression(&mut slots, expr)
        .into_iter()
        .chain([RelativeOpcode::Match])
        .zip(0u32..)
        .map(|(opcode, idx)| opcode.into_opcode_with_index(idx))
        .collect();

    let program = Program::new(slots.num_slots(), opcodes);
    log::trace!("compiled program:\n{}", program);

    program
}

fn expression(slots: &mut SlotAllocator, expr: ast::Expression) -> RelativeOpcodes {
    let ast::Expression(factors) = expr;

    factors
        .into_iter()
        .flat_map(|f| factor(slots, f))
        .collect()
}

fn factor(slots: &mut SlotAllocator, f: ast::Factor) -> RelativeOpcodes {
    match f {
        ast::Factor::WithoutQuantifier { atom: a } => atom(slots, a),
        ast::Factor::WithQuantifier { atom: a, quantifier } => {
            quantified_block(quantifier, atom(slots, a))
        }
    }
}

fn atom(slots: &mut SlotAllocator, a: ast::Atom) -> RelativeOpcodes {
    match a {
        ast::Atom::Group(ast::Group(expr)) => {
            // slots are claimed before descending so that groups are numbered
            // by their opening parenthesis.
            let (start_slot, end_slot) = slots.allocate_group();

            [RelativeOpcode::Save(start_slot)]
                .into_iter()
                .chain(expression(slots, expr))
                .chain([RelativeOpcode::Save(end_slot)])
                .collect()
        }
        ast::Atom::AnyCharacter => vec![RelativeOpcode::Any],
        ast::Atom::EscapedCharacter(ast::Char(c)) | ast::Atom::Character(ast::Char(c)) => {
            vec![RelativeOpcode::Consume(c)]
        }
    }
}

/// Wraps a block in the branching required by its quantifier. In every case
/// the `x` branch of the split enters the block, making each quantifier
/// greedy.
fn quantified_block(quantifier: ast::Quantifier, block: RelativeOpcodes) -> RelativeOpcodes {
    let block_len = block.len() as i32;

    match quantifier {
        ast::Quantifier::ZeroOrMore => [RelativeOpcode::Split(1, block_len + 2)]
            .into_iter()
            .chain(block)
            // return to split
            .chain([RelativeOpcode::Jmp(-(block_len + 1))])
            .collect(),
        ast::Quantifier::OneOrMore => block
            .into_iter()
            .chain([RelativeOpcode::Split(-block_len, 1)])
            .collect(),
        ast::Quantifier::ZeroOrOne => [RelativeOpcode::Split(1, block_len + 1)]
            .into_iter()
            .chain(block)
            .collect(),
    }
}
