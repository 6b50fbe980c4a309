//! Lazy enumeration of the Kleene closure of an alphabet and of the strings a machine
//! accepts.
//!
//! Strings come out ordered by length, and within one length lexicographically with respect
//! to the order of the alphabet slice (the declaration order of the machine's input
//! alphabet). Nothing is computed ahead of the caller: each `next` produces exactly one
//! candidate.
//!
//! [`AcceptedLanguage`] runs the machine on every candidate. A machine that diverges on some
//! input makes the enumeration hang at that input; there is no step bound.

use crate::machine::TuringMachine;
use crate::types::Verdict;

/// Iterator over every finite string of an alphabet.
///
/// Infinite for a non-empty alphabet. For an empty alphabet it yields only the empty string.
#[derive(Debug, Clone)]
pub struct Strings {
    alphabet: Vec<char>,
    /// Alphabet index of every position of the next string, most significant first.
    /// `None` once the enumeration is exhausted.
    digits: Option<Vec<usize>>,
}

impl Strings {
    /// Repeated symbols are dropped, keeping the first occurrence, so no string is produced
    /// twice.
    pub fn new(alphabet: &[char]) -> Self {
        let mut unique = Vec::with_capacity(alphabet.len());
        for &symbol in alphabet {
            if !unique.contains(&symbol) {
                unique.push(symbol);
            }
        }

        Self {
            alphabet: unique,
            digits: Some(Vec::new()),
        }
    }

    /// Moves `digits` to the next string, growing the length when every position has
    /// wrapped around.
    fn advance(&mut self) {
        if self.alphabet.is_empty() {
            self.digits = None;
            return;
        }

        let Some(digits) = self.digits.as_mut() else {
            return;
        };

        for digit in digits.iter_mut().rev() {
            *digit += 1;
            if *digit < self.alphabet.len() {
                return;
            }
            *digit = 0;
        }

        digits.push(0);
    }
}

impl Iterator for Strings {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let word = self
            .digits
            .as_ref()?
            .iter()
            .map(|&i| self.alphabet[i])
            .collect();

        self.advance();

        Some(word)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match (&self.digits, self.alphabet.is_empty()) {
            (None, _) => (0, Some(0)),
            (Some(_), true) => (1, Some(1)),
            (Some(_), false) => (usize::MAX, None),
        }
    }
}

/// Enumerates every finite string over `alphabet`, shortest first.
///
/// Each call starts over at the empty string.
pub fn enumerate_strings(alphabet: &[char]) -> Strings {
    Strings::new(alphabet)
}

/// Iterator over the strings accepted by a machine, in enumeration order.
pub struct AcceptedLanguage<'m> {
    machine: &'m TuringMachine,
    candidates: Strings,
}

impl<'m> AcceptedLanguage<'m> {
    pub fn new(machine: &'m TuringMachine) -> Self {
        Self {
            machine,
            candidates: enumerate_strings(machine.input_alphabet()),
        }
    }
}

impl Iterator for AcceptedLanguage<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let machine = self.machine;
        // Candidates are drawn from the input alphabet, so input validation can be skipped.
        self.candidates
            .find(|word| machine.execute_unchecked(word).verdict == Verdict::Accepted)
    }
}

/// Enumerates the strings accepted by `machine`, shortest first.
pub fn accepted_language(machine: &TuringMachine) -> AcceptedLanguage<'_> {
    AcceptedLanguage::new(machine)
}

/// Collects the first `n` strings accepted by `machine`.
///
/// Fewer than `n` strings are returned only when the input alphabet is empty. If the machine
/// accepts fewer than `n` strings over a non-empty alphabet, this never returns.
pub fn first_n_accepted(machine: &TuringMachine, n: usize) -> Vec<String> {
    accepted_language(machine).take(n).collect()
}

impl TuringMachine {
    /// Enumerates the strings this machine accepts. See [`accepted_language`].
    pub fn accepted_language(&self) -> AcceptedLanguage<'_> {
        AcceptedLanguage::new(self)
    }
}
