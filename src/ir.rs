//! Intermediate Representation (IR) for compiled templates.
//!
//! A `Block` is one node-level list of instruction records. Blocks nest: a
//! `ChildRecurse` record owns the complete block of the element it adds.
//! Nothing in a block depends on the dynamic values, so one block can be built
//! any number of times.

use crate::types::{FieldIndex, Literal};
use serde::{Deserialize, Serialize};

/// Operation tag of an instruction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    TagSet,
    PropsAssign,
    PropSet,
    PropAppend,
    ChildAppend,
    ChildRecurse,
}

/// A single instruction record.
///
/// Operands with a `field` read the embedded `literal` when the field index is
/// 0 and the dynamic value at `field - 1` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// Set the element's tag name.
    TagSet { field: FieldIndex, literal: String },
    /// Append a spread placeholder; closes the open named-attribute set.
    PropsAssign { field: FieldIndex },
    /// Open attribute `name` with its first value part.
    PropSet {
        name: String,
        field: FieldIndex,
        literal: Literal,
    },
    /// Add another value part to attribute `name`.
    PropAppend {
        name: String,
        field: FieldIndex,
        literal: Literal,
    },
    /// Add text or a dynamic value as a child.
    ChildAppend { field: FieldIndex, literal: String },
    /// Add a nested element described by `block`.
    ChildRecurse { block: Block },
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::TagSet { .. } => Opcode::TagSet,
            Instruction::PropsAssign { .. } => Opcode::PropsAssign,
            Instruction::PropSet { .. } => Opcode::PropSet,
            Instruction::PropAppend { .. } => Opcode::PropAppend,
            Instruction::ChildAppend { .. } => Opcode::ChildAppend,
            Instruction::ChildRecurse { .. } => Opcode::ChildRecurse,
        }
    }

    /// Field index of the operand, `None` for `ChildRecurse`.
    pub fn field(&self) -> Option<FieldIndex> {
        match self {
            Instruction::TagSet { field, .. }
            | Instruction::PropsAssign { field }
            | Instruction::PropSet { field, .. }
            | Instruction::PropAppend { field, .. }
            | Instruction::ChildAppend { field, .. } => Some(*field),
            Instruction::ChildRecurse { .. } => None,
        }
    }
}

/// One node-level list of instruction records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Block {
    instructions: Vec<Instruction>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Highest field index referenced anywhere in this block and its nested
    /// blocks, i.e. the number of dynamic values a build needs at least.
    pub fn field_count(&self) -> usize {
        self.instructions
            .iter()
            .map(|instr| match instr {
                Instruction::ChildRecurse { block } => block.field_count(),
                other => other.field().map_or(0, |f| f.0),
            })
            .max()
            .unwrap_or(0)
    }
}

impl From<Vec<Instruction>> for Block {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }
}

impl<'a> IntoIterator for &'a Block {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_mapping() {
        let instr = Instruction::PropAppend {
            name: "class".into(),
            field: FieldIndex(2),
            literal: Literal::Str(String::new()),
        };
        assert_eq!(instr.opcode(), Opcode::PropAppend);
        assert_eq!(instr.field(), Some(FieldIndex(2)));
        let recurse = Instruction::ChildRecurse { block: Block::new() };
        assert_eq!(recurse.opcode(), Opcode::ChildRecurse);
        assert_eq!(recurse.field(), None);
    }

    #[test]
    fn test_field_count_descends_into_children() {
        let inner = Block::from(vec![
            Instruction::TagSet { field: FieldIndex::LITERAL, literal: "b".into() },
            Instruction::ChildAppend { field: FieldIndex(3), literal: String::new() },
        ]);
        let outer = Block::from(vec![
            Instruction::ChildAppend { field: FieldIndex(1), literal: String::new() },
            Instruction::ChildRecurse { block: inner },
        ]);
        assert_eq!(outer.field_count(), 3);
        assert_eq!(Block::new().field_count(), 0);
    }

    #[test]
    fn test_block_serialization_deserialization() {
        let block = Block::from(vec![
            Instruction::TagSet { field: FieldIndex::LITERAL, literal: "div".into() },
            Instruction::PropSet {
                name: "disabled".into(),
                field: FieldIndex::LITERAL,
                literal: Literal::Bool(true),
            },
            Instruction::PropsAssign { field: FieldIndex(1) },
        ]);
        let json = serde_json::to_string(&block).unwrap();
        let deser: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(block, deser);
    }
}
