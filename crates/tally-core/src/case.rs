//! Test case abstraction and late-bound method dispatch
//!
//! A case is identified by a name; the name selects which registered
//! method is "the test". Concrete cases implement [`Registered`]: they hold
//! a [`CaseName`] and list their zero-argument methods in a
//! [`MethodTable`]. The blanket [`TestCase`] impl looks the method up by
//! name on every dispatch. Each type's table is built once and shared.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{OnceLock, PoisonError, RwLock};

/// A zero-argument method bound to a concrete case type
pub type Method<T> = fn(&mut T);

/// Outcome of looking up and calling a method by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The method existed and returned
    Invoked,
    /// No method is registered under that name
    Unresolved,
}

/// Object-safe view of a test case used by the executor and suite
pub trait TestCase: Send {
    /// The name of the method to run as the test
    fn name(&self) -> &str;

    /// Look up `method` by name and call it
    fn dispatch(&mut self, method: &str) -> Dispatch;

    /// Whether `method` is registered, without calling it
    fn responds_to(&self, method: &str) -> bool;
}

/// Identifying name composed into every concrete case
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaseName(String);

impl CaseName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CaseName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Name -> method registry for one case type
pub struct MethodTable<T> {
    methods: HashMap<&'static str, Method<T>>,
}

impl<T> MethodTable<T> {
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
        }
    }

    /// Register `method` under `name`, replacing any earlier entry
    pub fn register(&mut self, name: &'static str, method: Method<T>) -> &mut Self {
        self.methods.insert(name, method);
        self
    }

    pub fn resolve(&self, name: &str) -> Option<Method<T>> {
        self.methods.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.methods.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<T> Default for MethodTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for MethodTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodTable")
            .field("methods", &self.names())
            .finish()
    }
}

/// A concrete case type that registers its methods by name
///
/// `set_up` and `tear_down` are optional; register them only if the type
/// has fixture work to do.
pub trait Registered: Send + Sized + 'static {
    fn case_name(&self) -> &CaseName;

    fn register(methods: &mut MethodTable<Self>);

    /// A freshly populated method table for this type
    fn method_table() -> MethodTable<Self> {
        let mut table = MethodTable::new();
        Self::register(&mut table);
        table
    }

    /// The shared method table for this type, built on first use
    fn methods() -> &'static MethodTable<Self> {
        shared_table::<Self>()
    }
}

type TableRegistry = RwLock<HashMap<TypeId, &'static (dyn Any + Send + Sync)>>;

fn shared_table<T: Registered>() -> &'static MethodTable<T> {
    static TABLES: OnceLock<TableRegistry> = OnceLock::new();
    let tables = TABLES.get_or_init(Default::default);
    let id = TypeId::of::<T>();

    let cached = tables
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .copied();
    let erased = match cached {
        Some(table) => table,
        None => {
            // Built outside the lock: `register` is user code and may panic.
            let built = T::method_table();
            let mut tables = tables.write().unwrap_or_else(PoisonError::into_inner);
            *tables.entry(id).or_insert_with(|| {
                let table: &'static MethodTable<T> = Box::leak(Box::new(built));
                let erased: &'static (dyn Any + Send + Sync) = table;
                erased
            })
        }
    };

    match erased.downcast_ref::<MethodTable<T>>() {
        Some(table) => table,
        None => unreachable!("method table stored under a foreign TypeId"),
    }
}

impl<T: Registered> TestCase for T {
    fn name(&self) -> &str {
        self.case_name().as_str()
    }

    fn dispatch(&mut self, method: &str) -> Dispatch {
        match T::methods().resolve(method) {
            Some(f) => {
                f(self);
                Dispatch::Invoked
            }
            None => Dispatch::Unresolved,
        }
    }

    fn responds_to(&self, method: &str) -> bool {
        T::methods().contains(method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        case: CaseName,
        hits: u32,
    }

    impl Counter {
        fn bump(&mut self) {
            self.hits += 1;
        }

        fn bump_twice(&mut self) {
            self.hits += 2;
        }
    }

    impl Registered for Counter {
        fn case_name(&self) -> &CaseName {
            &self.case
        }

        fn register(methods: &mut MethodTable<Self>) {
            methods
                .register("bump", Counter::bump)
                .register("bump_twice", Counter::bump_twice);
        }
    }

    fn counter(name: &str) -> Counter {
        Counter {
            case: CaseName::new(name),
            hits: 0,
        }
    }

    #[test]
    fn test_dispatch_by_name() {
        let mut case = counter("bump_twice");
        assert_eq!(case.dispatch("bump"), Dispatch::Invoked);
        assert_eq!(case.dispatch("bump_twice"), Dispatch::Invoked);
        assert_eq!(case.hits, 3);
    }

    #[test]
    fn test_dispatch_unresolved() {
        let mut case = counter("bump");
        assert_eq!(case.dispatch("set_up"), Dispatch::Unresolved);
        assert_eq!(case.hits, 0);
    }

    #[test]
    fn test_name_selects_test_method() {
        let mut case = counter("bump_twice");
        let name = case.name().to_string();
        case.dispatch(&name);
        assert_eq!(case.hits, 2);
    }

    #[test]
    fn test_dyn_case() {
        let mut boxed: Box<dyn TestCase> = Box::new(counter("bump"));
        assert_eq!(boxed.name(), "bump");
        assert!(boxed.responds_to("bump"));
        assert!(!boxed.responds_to("tear_down"));
        assert_eq!(boxed.dispatch("bump"), Dispatch::Invoked);
    }

    #[test]
    fn test_method_table_names_sorted() {
        let table = Counter::method_table();
        assert_eq!(table.names(), vec!["bump", "bump_twice"]);
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_shared_table_built_once_per_type() {
        assert!(std::ptr::eq(Counter::methods(), Counter::methods()));
        assert_eq!(Counter::methods().names(), vec!["bump", "bump_twice"]);

        let mut case = counter("bump");
        for _ in 0..3 {
            case.dispatch("bump");
        }
        assert!(std::ptr::eq(Counter::methods(), Counter::methods()));
        assert_eq!(case.hits, 3);
    }

    #[test]
    fn test_register_replaces() {
        let mut table: MethodTable<Counter> = MethodTable::new();
        table.register("go", Counter::bump);
        table.register("go", Counter::bump_twice);

        let mut case = counter("go");
        (table.resolve("go").unwrap())(&mut case);
        assert_eq!(case.hits, 2);
        assert_eq!(table.len(), 1);
    }
}
