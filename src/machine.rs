//! The machine itself: an immutable, validated transition table plus the
//! per-run execution cursor that drives a [`Tape`] through it until a
//! halting state is reached.

use crate::tape::Tape;
use crate::types::{Action, MachineError, Program, State, Symbol};

/// A validated machine.
///
/// Holds only the static description: per-state actions, the next-state and
/// output tables (compiled to dense per-symbol rows), and the start state.
/// All run state lives in [`Execution`], so a `Machine` can be reused across
/// any number of runs, sequential or concurrent, without locking.
#[derive(Debug, Clone)]
pub struct Machine {
    start: State,
    actions: Vec<Action>,
    next: Vec<[State; Symbol::COUNT]>,
    out: Vec<[Symbol; Symbol::COUNT]>,
}

/// The outcome of a single execution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The machine performed a step and continues.
    Continue,
    /// The current state's action is `Halt`; the run is over.
    Halted,
}

impl Machine {
    /// Builds a machine from a parsed description, validating it first.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::MalformedMachine`] if the description has no
    /// states, the start state or any referenced next state is out of range,
    /// the table row counts don't match the state count, or any state's
    /// tables lack an entry for one of the three symbols.
    pub fn new(program: Program) -> Result<Self, MachineError> {
        Self::validate(&program)?;

        // Every lookup below is guaranteed present by validate().
        let next = program
            .next
            .iter()
            .map(|row| Symbol::ALPHABET.map(|sym| row[&sym]))
            .collect();
        let out = program
            .out
            .iter()
            .map(|row| Symbol::ALPHABET.map(|sym| row[&sym]))
            .collect();

        Ok(Self {
            start: program.start,
            actions: program.actions,
            next,
            out,
        })
    }

    /// Checks the structural invariants of a description without building
    /// a machine.
    pub fn validate(program: &Program) -> Result<(), MachineError> {
        let states = program.state_count();
        if states == 0 {
            return Err(MachineError::MalformedMachine(
                "machine has no states".to_string(),
            ));
        }

        if program.start >= states {
            return Err(MachineError::MalformedMachine(format!(
                "start state {} out of range (machine has {} states)",
                program.start, states
            )));
        }

        if program.next.len() != states {
            return Err(MachineError::MalformedMachine(format!(
                "next-state table has {} rows for {} states",
                program.next.len(),
                states
            )));
        }

        if program.out.len() != states {
            return Err(MachineError::MalformedMachine(format!(
                "output table has {} rows for {} states",
                program.out.len(),
                states
            )));
        }

        for (state, row) in program.next.iter().enumerate() {
            for sym in Symbol::ALPHABET {
                match row.get(&sym) {
                    None => {
                        return Err(MachineError::MalformedMachine(format!(
                            "state {} has no next-state entry for '{}'",
                            state,
                            sym.as_char()
                        )))
                    }
                    Some(&target) if target >= states => {
                        return Err(MachineError::MalformedMachine(format!(
                            "state {} transitions to undefined state {} on '{}'",
                            state,
                            target,
                            sym.as_char()
                        )))
                    }
                    Some(_) => {}
                }
            }
        }

        for (state, row) in program.out.iter().enumerate() {
            for sym in Symbol::ALPHABET {
                if !row.contains_key(&sym) {
                    return Err(MachineError::MalformedMachine(format!(
                        "state {} has no output entry for '{}'",
                        state,
                        sym.as_char()
                    )));
                }
            }
        }

        Ok(())
    }

    /// The start state.
    pub fn start(&self) -> State {
        self.start
    }

    /// Number of states.
    pub fn state_count(&self) -> usize {
        self.actions.len()
    }

    /// The action assigned to `state`.
    pub fn action(&self, state: State) -> Action {
        self.actions[state]
    }

    /// Begins a run over `input`: fresh tape seeded with the input (head on
    /// the first symbol), machine positioned at the start state.
    pub fn execution(&self, input: &[Symbol]) -> Execution<'_> {
        Execution {
            machine: self,
            state: self.start,
            tape: Tape::with_input(input),
            steps: 0,
        }
    }

    /// Runs the machine on `input` until it halts and returns the final
    /// tape contents.
    ///
    /// Never fails: validation guarantees every lookup is in range. It can
    /// loop forever on a description that never reaches a halting state;
    /// use [`run_bounded`](Self::run_bounded) to cap that.
    pub fn run(&self, input: &[Symbol]) -> Vec<Symbol> {
        let mut exec = self.execution(input);
        while exec.step() == Step::Continue {}
        exec.into_contents()
    }

    /// Like [`run`](Self::run), but gives up after `max_steps` steps.
    ///
    /// Returns `None` if the machine has not halted within the budget.
    pub fn run_bounded(&self, input: &[Symbol], max_steps: usize) -> Option<Vec<Symbol>> {
        let mut exec = self.execution(input);
        // One extra step() call: detecting the halt state costs no step.
        for _ in 0..=max_steps {
            if exec.step() == Step::Halted {
                return Some(exec.into_contents());
            }
        }
        None
    }

    fn next_state(&self, state: State, sym: Symbol) -> State {
        self.next[state][sym.index()]
    }

    fn output(&self, state: State, sym: Symbol) -> Symbol {
        self.out[state][sym.index()]
    }
}

/// A single run in progress: the machine's local state and tape.
///
/// Created by [`Machine::execution`]; dropped or drained when the run ends.
/// Nothing here outlives the run, so two runs can never contaminate each
/// other.
#[derive(Debug)]
pub struct Execution<'m> {
    machine: &'m Machine,
    state: State,
    tape: Tape,
    steps: usize,
}

impl Execution<'_> {
    /// Executes one step.
    ///
    /// Order matters and mirrors the table encoding convention: read the
    /// head symbol, write the output symbol, transition, then apply the
    /// move of the state just *entered*. The first state's action is thus
    /// consulted only after its first transition, and a halting state is
    /// recognized before any read.
    pub fn step(&mut self) -> Step {
        if self.machine.action(self.state) == Action::Halt {
            return Step::Halted;
        }

        let sym = self.tape.read();
        self.tape.write(self.machine.output(self.state, sym));
        self.state = self.machine.next_state(self.state, sym);

        match self.machine.action(self.state) {
            Action::MoveLeft => self.tape.move_left(),
            Action::MoveRight => self.tape.move_right(),
            Action::Halt => {} // next step() call reports Halted
        }

        self.steps += 1;
        Step::Continue
    }

    /// The state the machine is currently in.
    pub fn state(&self) -> State {
        self.state
    }

    /// Whether the current state is a halting state.
    pub fn is_halted(&self) -> bool {
        self.machine.action(self.state) == Action::Halt
    }

    /// Number of steps executed so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The run's tape.
    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Ends the run and returns the tape contents.
    pub fn into_contents(self) -> Vec<Symbol> {
        self.tape.into_contents()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::types::Symbol::{Blank, One, Zero};
    use std::collections::HashMap;

    const DECREMENT: &str = include_str!("../machines/decrement.txt");

    fn decrement_machine() -> Machine {
        Machine::new(parse(DECREMENT).unwrap()).unwrap()
    }

    fn symbols(s: &str) -> Vec<Symbol> {
        s.chars().map(|c| Symbol::from_char(c).unwrap()).collect()
    }

    fn rendered(symbols: &[Symbol]) -> String {
        symbols.iter().map(|s| s.as_char()).collect()
    }

    // A hand-built single-state halting machine description, complete
    // tables included.
    fn halt_only_program() -> Program {
        let next = HashMap::from([(Zero, 0), (One, 0), (Blank, 0)]);
        let out = HashMap::from([(Zero, Zero), (One, One), (Blank, Blank)]);
        Program {
            start: 0,
            actions: vec![Action::Halt],
            next: vec![next],
            out: vec![out],
        }
    }

    #[test]
    fn test_decrement_regression() {
        let machine = decrement_machine();
        let result = machine.run(&symbols("010000"));
        assert_eq!(rendered(&result), "001111#");
    }

    #[test]
    fn test_decrement_borrows_past_left_edge() {
        // Decrementing zero runs the borrow chain off the left end of the
        // input, materializing blanks on both sides.
        let machine = decrement_machine();
        let result = machine.run(&symbols("0"));
        assert_eq!(rendered(&result), "#1#");
    }

    #[test]
    fn test_decrement_single_one() {
        let machine = decrement_machine();
        let result = machine.run(&symbols("1"));
        assert_eq!(rendered(&result), "0#");
    }

    #[test]
    fn test_empty_input_equals_seeded_blank() {
        let machine = decrement_machine();
        let empty = machine.run(&[]);
        let seeded = machine.run(&[Blank]);
        assert_eq!(empty, seeded);
    }

    #[test]
    fn test_sequential_runs_share_no_tape() {
        let machine = decrement_machine();
        let first = machine.run(&symbols("010000"));
        let second = machine.run(&symbols("010000"));
        assert_eq!(first, second);

        // A long run followed by a short one: nothing from run one shows up.
        let _ = machine.run(&symbols("111111"));
        let short = machine.run(&symbols("1"));
        assert_eq!(rendered(&short), "0#");
    }

    #[test]
    fn test_move_uses_entered_states_action() {
        // start (R) rewrites its cell and transitions to a left-moving
        // state; the move applied must be the entered state's L, so the
        // head lands on a synthesized blank left of the input.
        let next = vec![
            HashMap::from([(Zero, 1), (One, 1), (Blank, 1)]),
            HashMap::from([(Zero, 2), (One, 2), (Blank, 2)]),
            HashMap::from([(Zero, 0), (One, 0), (Blank, 0)]),
        ];
        let out = vec![
            HashMap::from([(Zero, One), (One, One), (Blank, Blank)]),
            HashMap::from([(Zero, Zero), (One, One), (Blank, Blank)]),
            HashMap::from([(Zero, Zero), (One, One), (Blank, Blank)]),
        ];
        let program = Program {
            start: 0,
            actions: vec![Action::MoveRight, Action::MoveLeft, Action::Halt],
            next,
            out,
        };
        let machine = Machine::new(program).unwrap();
        let result = machine.run(&symbols("01"));
        // Step 1: write '1' over the '0', enter state 1, move LEFT onto a
        // synthesized blank. Step 2: state 1 reads '#', enters halt state,
        // no move. Were the exited state's action applied instead, the head
        // would have moved right and the blank never materialized.
        assert_eq!(rendered(&result), "#11");
    }

    #[test]
    fn test_step_level_observation() {
        let machine = decrement_machine();
        let input = symbols("01");
        let mut exec = machine.execution(&input);

        assert_eq!(exec.state(), machine.start());
        assert!(!exec.is_halted());

        let mut steps = 0;
        while exec.step() == Step::Continue {
            steps += 1;
        }
        assert!(exec.is_halted());
        assert_eq!(exec.steps(), steps);
        assert_eq!(rendered(&exec.into_contents()), "00#");
    }

    #[test]
    fn test_run_bounded_budget() {
        let machine = decrement_machine();
        let input = symbols("010000");

        // Count the actual steps, then check the boundary.
        let mut exec = machine.execution(&input);
        let mut steps = 0;
        while exec.step() == Step::Continue {
            steps += 1;
        }

        assert_eq!(machine.run_bounded(&input, steps), Some(machine.run(&input)));
        assert_eq!(machine.run_bounded(&input, steps - 1), None);
    }

    #[test]
    fn test_run_bounded_on_looping_machine() {
        // Two states bouncing between each other, never halting.
        let row = |target: State| HashMap::from([(Zero, target), (One, target), (Blank, target)]);
        let ident = HashMap::from([(Zero, Zero), (One, One), (Blank, Blank)]);
        let program = Program {
            start: 0,
            actions: vec![Action::MoveRight, Action::MoveLeft],
            next: vec![row(1), row(0)],
            out: vec![ident.clone(), ident],
        };
        let machine = Machine::new(program).unwrap();
        assert_eq!(machine.run_bounded(&symbols("0"), 1000), None);
    }

    #[test]
    fn test_halt_start_state_runs_zero_steps() {
        let machine = Machine::new(halt_only_program()).unwrap();
        assert_eq!(machine.run(&symbols("0101")), symbols("0101"));
    }

    #[test]
    fn test_validate_rejects_empty_machine() {
        let program = Program {
            start: 0,
            actions: vec![],
            next: vec![],
            out: vec![],
        };
        assert!(matches!(
            Machine::new(program),
            Err(MachineError::MalformedMachine(_))
        ));
    }

    #[test]
    fn test_validate_rejects_start_one_past_end() {
        let mut program = halt_only_program();
        program.start = 1;
        assert!(matches!(
            Machine::new(program),
            Err(MachineError::MalformedMachine(_))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_symbol_entry() {
        let mut program = halt_only_program();
        program.next[0].remove(&One);
        let err = Machine::new(program).unwrap_err();
        match err {
            MachineError::MalformedMachine(msg) => assert!(msg.contains("next-state entry")),
            other => panic!("expected MalformedMachine, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_missing_output_entry() {
        let mut program = halt_only_program();
        program.out[0].remove(&Blank);
        let err = Machine::new(program).unwrap_err();
        match err {
            MachineError::MalformedMachine(msg) => assert!(msg.contains("output entry")),
            other => panic!("expected MalformedMachine, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range_next_state() {
        let mut program = halt_only_program();
        program.next[0].insert(Blank, 7);
        let err = Machine::new(program).unwrap_err();
        match err {
            MachineError::MalformedMachine(msg) => assert!(msg.contains("undefined state 7")),
            other => panic!("expected MalformedMachine, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_short_table() {
        let mut program = halt_only_program();
        program.actions.push(Action::Halt); // two states, one table row
        assert!(matches!(
            Machine::new(program),
            Err(MachineError::MalformedMachine(_))
        ));
    }
}
