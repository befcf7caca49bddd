use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub type ScopeRef = Rc<RefCell<Scope>>;

/// A lexical scope. Lookups and assignments walk the parent chain;
/// definitions always land in the innermost scope.
#[derive(Debug, Default)]
pub struct Scope {
    store: HashMap<String, Value>,
    parent: Option<ScopeRef>,
}

impl Scope {
    pub fn global() -> ScopeRef {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn child(parent: &ScopeRef) -> ScopeRef {
        Rc::new(RefCell::new(Self {
            store: HashMap::new(),
            parent: Some(Rc::clone(parent)),
        }))
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self
                .parent
                .as_ref()
                .and_then(|parent| parent.borrow().get(name)),
        }
    }

    pub fn define(&mut self, name: &str, value: Value) {
        self.store.insert(name.to_owned(), value);
    }

    /// Rebinds an existing name, searching outward. Returns false when
    /// the name is not bound anywhere in the chain.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        if let Some(slot) = self.store.get_mut(name) {
            *slot = value;
            return true;
        }
        match &self.parent {
            Some(parent) => parent.borrow_mut().assign(name, value),
            None => false,
        }
    }
}
