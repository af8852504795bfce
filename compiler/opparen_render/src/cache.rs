//! First-in first-out cache of compiled grammars.
//!
//! Compiling and resolving a grammar is a pure function of the operator
//! table, so entries are keyed by the table's canonical JSON text and never
//! go stale.

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use opparen_ast::OperatorTable;

use crate::adapter::ParserAdapter;

/// Key for `table`, or `None` if it cannot be serialized.
pub fn table_key(table: &OperatorTable) -> Option<String> {
    match serde_json::to_string(table) {
        Ok(key) => Some(key),
        Err(err) => {
            log::warn!("operator table is not cacheable: {err}");
            None
        }
    }
}

#[derive(Debug)]
pub struct GrammarCache {
    capacity: usize,
    entries: HashMap<String, Rc<ParserAdapter>>,
    order: VecDeque<String>,
    hits: u64,
    misses: u64,
}

impl GrammarCache {
    /// A cache holding at most `capacity` grammars; 0 disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, key: &str) -> Option<Rc<ParserAdapter>> {
        match self.entries.get(key) {
            Some(adapter) => {
                self.hits += 1;
                Some(Rc::clone(adapter))
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Stores `adapter`, evicting the oldest entry when full.
    pub fn insert(&mut self, key: String, adapter: Rc<ParserAdapter>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(key.clone(), adapter).is_some() {
            return;
        }
        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                log::trace!("evicting cached grammar {oldest}");
                self.entries.remove(&oldest);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opparen_ast::Operator;
    use opparen_engine::DEFAULT_MAX_DEPTH;
    use opparen_grammar::compile;

    fn entry(table: &OperatorTable) -> (String, Rc<ParserAdapter>) {
        let adapter = ParserAdapter::new(compile(table), DEFAULT_MAX_DEPTH).unwrap();
        (table_key(table).unwrap(), Rc::new(adapter))
    }

    fn table(symbol: &str) -> OperatorTable {
        OperatorTable::new(vec![Operator::left(symbol, 1)])
    }

    #[test]
    fn keys_are_canonical_json() {
        assert_eq!(
            table_key(&table("+")).unwrap(),
            r#"[{"symbol":"+","precedence":1,"associativity":"left"}]"#
        );
        assert_eq!(table_key(&OperatorTable::empty()).unwrap(), "[]");
    }

    #[test]
    fn evicts_oldest_first() {
        let mut cache = GrammarCache::new(2);
        for symbol in ["+", "-", "*"] {
            let (key, adapter) = entry(&table(symbol));
            cache.insert(key, adapter);
        }
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&table_key(&table("+")).unwrap()).is_none());
        assert!(cache.get(&table_key(&table("*")).unwrap()).is_some());
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let mut cache = GrammarCache::new(0);
        let (key, adapter) = entry(&table("+"));
        cache.insert(key.clone(), adapter);
        assert!(cache.is_empty());
        assert!(cache.get(&key).is_none());
    }
}
