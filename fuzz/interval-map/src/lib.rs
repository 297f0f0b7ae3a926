use arbitrary::Arbitrary;
use interval_map::CompressedIntervalMap;

/// Size of the key space the model tracks
pub const KEYS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub struct Value(u8);

impl Value {
    // Few distinct values so merges actually happen
    fn fold(self) -> u8 { self.0 % 4 }
}

#[derive(Debug, Clone, Copy, Arbitrary)]
pub struct Assign {
    begin: u8,
    end: u8,
    value: Value,
}

impl Assign {
    fn key(k: u8) -> usize { usize::from(k) % (KEYS + 1) }
}

/// Apply `ops` to both a compressed map and a dense array, asserting they
/// agree on every key after each step
pub fn run_differential(base: Value, ops: &[Assign]) {
    let base = base.fold();
    let mut map = CompressedIntervalMap::<usize, u8>::new(base);
    let mut dense = [base; KEYS + 1];

    for op in ops {
        let (begin, end) = (Assign::key(op.begin), Assign::key(op.end));
        let value = op.value.fold();

        map.assign(begin, end, value);
        if begin < end {
            dense[begin..end].fill(value);
        }

        map.assert_invariants();
        for (key, expected) in dense.iter().enumerate() {
            assert_eq!(map.lookup(&key), expected, "key = {key}, map = {map:?}");
        }

        let changes = dense.windows(2).filter(|w| w[0] != w[1]).count()
            + usize::from(dense[0] != base);
        assert_eq!(map.len(), changes, "map = {map:?}");
    }
}
