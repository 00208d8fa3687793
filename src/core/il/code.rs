use crate::core::il::command::{Command, LabelId};
use crate::core::il::value::{ILValue, Literal, ValueId, ValueKind};
use crate::core::types::CType;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone)]
pub struct ValueInfo {
    pub ctype: CType,
    pub kind: ValueKind,
}

/// ordered command list plus the side tables codegen needs
#[derive(Debug, Clone, Default)]
pub struct ILCode {
    pub commands: Vec<Command>,
    values: Vec<ValueInfo>,
    string_literals: Vec<(ValueId, Vec<u8>)>,
    externs: HashMap<String, ValueId>,
    next_label: usize,
}

impl ILCode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, command: Command) {
        self.commands.push(command);
    }

    fn new_id(&mut self, ctype: CType, kind: ValueKind) -> ValueId {
        let id = ValueId(self.values.len());
        self.values.push(ValueInfo { ctype, kind });
        id
    }

    /// fresh temporary
    pub fn new_value(&mut self, ctype: CType) -> ILValue {
        let id = self.new_id(ctype.clone(), ValueKind::Temp);
        ILValue {
            id,
            ctype,
            null_ptr_const: false,
        }
    }

    pub fn new_literal(&mut self, ctype: CType, literal: Literal) -> ILValue {
        let id = self.new_id(ctype.clone(), ValueKind::Literal(literal));
        ILValue {
            id,
            ctype,
            null_ptr_const: literal.value == 0,
        }
    }

    /// char array value backed by a data section entry, bytes include the nul
    pub fn register_string_literal(&mut self, bytes: Vec<u8>) -> ILValue {
        let ctype = CType::array_of(CType::char(), Some(bytes.len() as u64));
        let index = self.string_literals.len();
        let id = self.new_id(ctype.clone(), ValueKind::StringLiteral(index));
        self.string_literals.push((id, bytes));
        ILValue {
            id,
            ctype,
            null_ptr_const: false,
        }
    }

    /// external symbol, redeclaring a name reuses its value
    pub fn register_extern(&mut self, name: &str, ctype: CType) -> ILValue {
        if let Some(&id) = self.externs.get(name) {
            return ILValue {
                id,
                ctype: self.values[id.0].ctype.clone(),
                null_ptr_const: false,
            };
        }
        let id = self.new_id(ctype.clone(), ValueKind::Extern(name.to_string()));
        self.externs.insert(name.to_string(), id);
        ILValue {
            id,
            ctype,
            null_ptr_const: false,
        }
    }

    pub fn register_local(&mut self, name: &str, ctype: CType) -> ILValue {
        let id = self.new_id(ctype.clone(), ValueKind::Local(name.to_string()));
        ILValue {
            id,
            ctype,
            null_ptr_const: false,
        }
    }

    /// labels are never reused within one unit
    pub fn get_label(&mut self) -> LabelId {
        self.next_label += 1;
        LabelId(self.next_label)
    }

    pub fn value(&self, id: ValueId) -> Option<&ValueInfo> {
        self.values.get(id.0)
    }

    pub fn ctype(&self, id: ValueId) -> Option<&CType> {
        self.value(id).map(|v| &v.ctype)
    }

    pub fn literal(&self, id: ValueId) -> Option<Literal> {
        match self.value(id)?.kind {
            ValueKind::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> impl Iterator<Item = (ValueId, &ValueInfo)> {
        self.values.iter().enumerate().map(|(i, v)| (ValueId(i), v))
    }

    pub fn string_literals(&self) -> &[(ValueId, Vec<u8>)] {
        &self.string_literals
    }

    /// extern names in first declaration order
    pub fn extern_names(&self) -> Vec<&str> {
        let mut names: Vec<(ValueId, &str)> = self
            .externs
            .iter()
            .map(|(name, id)| (*id, name.as_str()))
            .collect();
        names.sort();
        names.into_iter().map(|(_, name)| name).collect()
    }

    fn describe(&self, id: ValueId) -> String {
        match self.value(id).map(|v| &v.kind) {
            Some(ValueKind::Literal(lit)) => lit.to_string(),
            Some(ValueKind::StringLiteral(n)) => format!("__strlit{}", n),
            Some(ValueKind::Extern(name)) => name.clone(),
            Some(ValueKind::Local(name)) => format!("{}.{}", name, id.0),
            Some(ValueKind::Temp) | None => id.to_string(),
        }
    }
}

impl fmt::Display for ILCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |id: ValueId| self.describe(id);
        for command in &self.commands {
            if !matches!(command, Command::Label { .. }) {
                f.write_str("    ")?;
            }
            command.render(f, &name)?;
            f.write_str("\n")?;
        }
        Ok(())
    }
}
