use log::debug;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("Variable '{0}' is not declared")]
    Undeclared(String),
    #[error("Variable '{0}' is used before it is assigned")]
    Uninitialized(String),
    #[error("Too many variables (limit is {limit}) when adding '{name}'")]
    TooManyVariables { name: String, limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub value: i64,
    pub defined: bool,
}

/// Flat, program-lifetime variable storage. Symbols are never removed.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    index: HashMap<String, usize>,
    capacity: usize,
}

impl SymbolTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            symbols: Vec::new(),
            index: HashMap::new(),
            capacity,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns the existing slot, or creates one holding 0 and undefined.
    pub fn declare(&mut self, name: &str) -> Result<usize, SymbolError> {
        if let Some(idx) = self.lookup(name) {
            return Ok(idx);
        }

        if self.symbols.len() >= self.capacity {
            return Err(SymbolError::TooManyVariables {
                name: name.to_string(),
                limit: self.capacity,
            });
        }

        debug!("new variable '{}'", name);
        let idx = self.symbols.len();
        self.symbols.push(Symbol {
            name: name.to_string(),
            value: 0,
            defined: false,
        });
        self.index.insert(name.to_string(), idx);
        Ok(idx)
    }

    /// Clears the defined flag so the next read fails until a new assignment.
    pub fn undefine(&mut self, idx: usize) {
        if let Some(symbol) = self.symbols.get_mut(idx) {
            symbol.defined = false;
        }
    }

    pub fn set(&mut self, name: &str, value: i64) -> Result<(), SymbolError> {
        let idx = self.declare(name)?;
        let symbol = &mut self.symbols[idx];
        symbol.value = value;
        symbol.defined = true;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<i64, SymbolError> {
        let idx = self
            .lookup(name)
            .ok_or_else(|| SymbolError::Undeclared(name.to_string()))?;
        let symbol = &self.symbols[idx];
        if symbol.defined {
            Ok(symbol.value)
        } else {
            Err(SymbolError::Uninitialized(name.to_string()))
        }
    }

    pub fn symbol(&self, name: &str) -> Option<&Symbol> {
        self.lookup(name).map(|idx| &self.symbols[idx])
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}
