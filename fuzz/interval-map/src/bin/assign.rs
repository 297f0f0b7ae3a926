use fuzz_interval_map::{run_differential, Assign, Value};

fn main() {
    afl::fuzz!(|data: (Value, Vec<Assign>)| {
        let (base, ops) = data;
        run_differential(base, &ops);
    });
}
