/// Hands out the join aliases `v1, v2, …` of one SELECT.
///
/// Every SELECT, including each branch of a UNION, starts from a fresh allocator.
#[derive(Debug, Clone)]
pub struct VariableAllocator {
    next: usize,
}

impl Default for VariableAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn allocate(&mut self) -> String {
        let alias = format!("v{}", self.next);
        self.next += 1;
        alias
    }

    pub fn aliases(&self) -> impl Iterator<Item = String> {
        (1..self.next).map(|n| format!("v{n}"))
    }
}
