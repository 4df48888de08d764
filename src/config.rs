/// Interpreter settings. The binary fills this in from the command line and
/// environment; library users can start from `Config::default()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of cons cells the heap may hold.
    pub heap_capacity: usize,
    /// Evaluation steps allowed per top-level `eval_all` call.
    pub max_fuel: u64,
    /// Print lists of characters as double-quoted strings.
    pub print_strings: bool,
}

pub const DEFAULT_HEAP_CAPACITY: usize = 10_000_000;

impl Default for Config {
    fn default() -> Self {
        Config {
            heap_capacity: DEFAULT_HEAP_CAPACITY,
            max_fuel: u64::MAX,
            print_strings: true,
        }
    }
}

impl Config {
    pub fn with_heap_capacity(mut self, cells: usize) -> Self {
        self.heap_capacity = cells;
        self
    }

    pub fn with_max_fuel(mut self, steps: u64) -> Self {
        self.max_fuel = steps;
        self
    }

    pub fn with_print_strings(mut self, on: bool) -> Self {
        self.print_strings = on;
        self
    }
}
