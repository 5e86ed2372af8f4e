//! Builds the binary program whose feasible points are exactly the
//! well-formed nested texts that encode a schema's fact set.
//!
//! Variable families, all binary (`p` position, `d` depth, `t` identifier,
//! `s` shortcut, `f` fact):
//!
//! - `x[p,t]`       token `t` (identifier or parenthesis) sits at slot `p`
//! - `empty[p]`     slot `p` holds nothing
//! - `c[p,d,t]`     identifier `t` occupies depth `d` of the context at `p`
//! - `a[p,t]`       slot `p` emits `t` together with an opening parenthesis
//! - `r[p,t,s]`     the written form of `t` at `p` uses shortcut `s`
//!                  (first choice = full form; others only where the
//!                  substring occurs in `t`)
//! - `u[s]`         shortcut `s` is introduced in the preamble
//! - `m[f]`         fact `f` is expressible somewhere in the output
//! - two mention variables per fact and position, one per orientation

use std::collections::{HashMap, HashSet};

use squish_config::{CompressOptions, ParenWeight};
use squish_milp::{Assignment, MilpModel, VarId};
use squish_schema::Schema;
use squish_token::Tokenizer;
use tracing::{debug, warn};

use crate::seed::{Paren, Slot, naive_slots};
use crate::shortcut::ShortcutMap;
use crate::{CompressError, Result};

/// One fact with its indicator variable.
#[derive(Debug, Clone, Copy)]
struct FactVar {
    /// Identifier index of the smaller pair element.
    left: usize,
    /// Identifier index of the larger pair element.
    right: usize,
    /// Whether the output must (true) or must not (false) express it.
    truth: bool,
    /// The `m[f]` indicator.
    var: VarId,
}

/// Constructs the ILP for one schema.
pub struct IlpBuilder<'a> {
    schema: &'a Schema,
    shortcuts: &'a ShortcutMap,
    tokenizer: &'a dyn Tokenizer,
    options: &'a CompressOptions,
}

impl<'a> IlpBuilder<'a> {
    /// Creates a builder over borrowed inputs.
    ///
    /// `schema` must already be in its final shape (merged or not); the
    /// shortcut map must have been proposed before any merge.
    pub fn new(
        schema: &'a Schema,
        shortcuts: &'a ShortcutMap,
        tokenizer: &'a dyn Tokenizer,
        options: &'a CompressOptions,
    ) -> Self {
        Self {
            schema,
            shortcuts,
            tokenizer,
            options,
        }
    }

    /// Builds variables, constraints, objective, cuts, hints and warm start.
    pub fn build(self) -> Result<BuiltModel> {
        let ids = self.schema.identifiers();
        if ids.is_empty() {
            return Err(CompressError::EmptySchema);
        }
        let n_tables = self.schema.tables.len();
        let n_columns: usize = self.schema.tables.iter().map(|t| t.columns.len()).sum();

        let seed_slots = naive_slots(self.schema);
        let naive_len = seed_slots.len();
        let (max_length, mut seed_fits) = match self.options.upper_bound {
            Some(bound) if bound < naive_len => (bound, false),
            _ => (naive_len, true),
        };
        let max_depth = self.options.max_depth.max(1);
        if seed_nesting(&seed_slots) > max_depth {
            warn!(
                max_depth,
                "greedy rendering nests deeper than the depth budget, skipping warm start"
            );
            seed_fits = false;
        }

        let mut built = BuiltModel::with_variables(
            ids,
            n_tables,
            n_columns,
            self.shortcuts.clone(),
            self.schema,
            seed_slots,
            max_length,
            max_depth,
        );
        debug!(
            ids = built.ids.len(),
            facts = built.facts.len(),
            max_length,
            max_depth,
            "registered ILP variables"
        );

        built.slot_rows();
        built.balance_rows();
        built.context_rows();
        built.activation_rows();
        built.fact_rows();
        built.representation_rows();
        built.pruning_cuts();
        built.objective(self.tokenizer, self.options.paren_weight)?;
        if self.options.hints {
            built.add_hints(self.options.context_k);
        }
        if self.options.start {
            if seed_fits {
                built.install_start();
            } else {
                warn!(
                    naive_len,
                    bound = max_length,
                    "slot budget clamped below the greedy length, skipping warm start"
                );
            }
        }
        debug!(
            vars = built.model.num_vars(),
            rows = built.model.num_rows(),
            "ILP model complete"
        );
        Ok(built)
    }
}

/// Deepest context stack the slot sequence ever builds.
fn seed_nesting(slots: &[Slot]) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    for slot in slots {
        match slot.paren {
            Some(Paren::Open) => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            Some(Paren::Close) => depth = depth.saturating_sub(1),
            None => {}
        }
    }
    deepest
}

/// A finished model plus the symbolic layout needed to read assignments.
pub struct BuiltModel {
    /// The solver-facing model.
    pub model: MilpModel,
    ids: Vec<String>,
    id_index: HashMap<String, usize>,
    /// Identifier indices that are table predicates / column identifiers.
    table_range: std::ops::Range<usize>,
    column_range: std::ops::Range<usize>,
    shortcuts: ShortcutMap,
    seed_slots: Vec<Slot>,
    max_length: usize,
    max_depth: usize,
    n_tokens: usize,
    x: Vec<VarId>,
    empty: Vec<VarId>,
    ctx: Vec<VarId>,
    act: Vec<VarId>,
    rep_choices: Vec<Vec<Option<usize>>>,
    rep_offset: Vec<usize>,
    rep_block: usize,
    rep: Vec<VarId>,
    u: Vec<VarId>,
    facts: Vec<FactVar>,
    mentions: Vec<VarId>,
}

impl BuiltModel {
    /// Index of the `(` pseudo-token.
    fn open(&self) -> usize {
        self.ids.len()
    }

    /// Index of the `)` pseudo-token.
    fn close(&self) -> usize {
        self.ids.len() + 1
    }

    #[allow(clippy::too_many_arguments)]
    fn with_variables(
        ids: Vec<String>,
        n_tables: usize,
        n_columns: usize,
        shortcuts: ShortcutMap,
        schema: &Schema,
        seed_slots: Vec<Slot>,
        max_length: usize,
        max_depth: usize,
    ) -> Self {
        let n_ids = ids.len();
        let n_tokens = n_ids + 2;
        let mut model = MilpModel::new();

        let x = (0..max_length * n_tokens)
            .map(|_| model.add_binary())
            .collect();
        let empty = (0..max_length).map(|_| model.add_binary()).collect();
        let ctx = (0..max_length * max_depth * n_ids)
            .map(|_| model.add_binary())
            .collect();
        let act = (0..max_length * n_ids)
            .map(|_| model.add_binary())
            .collect();

        // Representation choices per identifier: the full form first, then
        // one entry per shortcut whose substring occurs in the identifier.
        let rep_choices: Vec<Vec<Option<usize>>> = ids
            .iter()
            .map(|ident| {
                let mut choices = vec![None];
                for (s, shortcut) in shortcuts.iter().enumerate() {
                    if ident.contains(&shortcut.substring) {
                        choices.push(Some(s));
                    }
                }
                choices
            })
            .collect();
        let mut rep_offset = Vec::with_capacity(n_ids);
        let mut rep_block = 0;
        for choices in &rep_choices {
            rep_offset.push(rep_block);
            rep_block += choices.len();
        }
        let rep = (0..max_length * rep_block)
            .map(|_| model.add_binary())
            .collect();
        let u = (0..shortcuts.len()).map(|_| model.add_binary()).collect();

        let id_index: HashMap<String, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, ident)| (ident.clone(), i))
            .collect();

        let fact_set = schema.facts();
        let mut facts = Vec::new();
        for (pairs, truth) in [(&fact_set.true_facts, true), (&fact_set.false_facts, false)] {
            for fact in pairs {
                match (id_index.get(fact.left()), id_index.get(fact.right())) {
                    (Some(&left), Some(&right)) => facts.push(FactVar {
                        left,
                        right,
                        truth,
                        var: model.add_binary(),
                    }),
                    _ => warn!(%fact, "fact references unknown identifier"),
                }
            }
        }
        let mentions = (0..facts.len() * max_length * 2)
            .map(|_| model.add_binary())
            .collect();

        Self {
            model,
            ids,
            id_index,
            table_range: 0..n_tables,
            column_range: n_tables..n_tables + n_columns,
            shortcuts,
            seed_slots,
            max_length,
            max_depth,
            n_tokens,
            x,
            empty,
            ctx,
            act,
            rep_choices,
            rep_offset,
            rep_block,
            rep,
            u,
            facts,
            mentions,
        }
    }

    // -- Variable lookup -----------------------------------------------------

    fn x_var(&self, p: usize, t: usize) -> VarId {
        self.x[p * self.n_tokens + t]
    }

    fn empty_var(&self, p: usize) -> VarId {
        self.empty[p]
    }

    fn ctx_var(&self, p: usize, d: usize, t: usize) -> VarId {
        self.ctx[(p * self.max_depth + d) * self.ids.len() + t]
    }

    fn act_var(&self, p: usize, t: usize) -> VarId {
        self.act[p * self.ids.len() + t]
    }

    fn rep_var(&self, p: usize, t: usize, choice: usize) -> VarId {
        self.rep[p * self.rep_block + self.rep_offset[t] + choice]
    }

    fn mention_var(&self, f: usize, p: usize, orientation: usize) -> VarId {
        self.mentions[(f * self.max_length + p) * 2 + orientation]
    }

    // -- Constraint groups ---------------------------------------------------

    /// Per-slot structure: parenthesis exclusivity, emptiness as the NOR of
    /// all token choices, right-padded empties, one identifier per slot,
    /// openings only next to an identifier.
    fn slot_rows(&mut self) {
        let n_ids = self.ids.len();
        for p in 0..self.max_length {
            let open = self.x_var(p, self.open());
            let close = self.x_var(p, self.close());
            let empty = self.empty_var(p);
            self.model
                .le(vec![(open, 1.0), (close, 1.0), (empty, 1.0)], 1.0);

            let mut nor = vec![(empty, 1.0)];
            for t in 0..self.n_tokens {
                let x = self.x_var(p, t);
                nor.push((x, 1.0));
                self.model.le(vec![(empty, 1.0), (x, 1.0)], 1.0);
            }
            self.model.ge(nor, 1.0);

            let one_ident: Vec<_> = (0..n_ids).map(|t| (self.x_var(p, t), 1.0)).collect();
            self.model.le(one_ident, 1.0);

            let mut opening = vec![(open, 1.0)];
            opening.extend((0..n_ids).map(|t| (self.x_var(p, t), -1.0)));
            self.model.le(opening, 0.0);
        }
        for p in 0..self.max_length.saturating_sub(1) {
            self.model.le(
                vec![(self.empty_var(p), 1.0), (self.empty_var(p + 1), -1.0)],
                0.0,
            );
        }
    }

    /// Global parenthesis balance plus the prefix dominance of openings.
    fn balance_rows(&mut self) {
        let mut balance = Vec::new();
        for p in 0..self.max_length {
            balance.push((self.x_var(p, self.open()), 1.0));
            balance.push((self.x_var(p, self.close()), -1.0));
        }
        self.model.eq(balance, 0.0);

        for p in 0..self.max_length {
            let mut prefix = Vec::new();
            for q in 0..=p {
                prefix.push((self.x_var(q, self.open()), 1.0));
                prefix.push((self.x_var(q, self.close()), -1.0));
            }
            self.model.ge(prefix, 0.0);
        }
    }

    /// Context stack well-formedness: no re-emission of an enclosing
    /// identifier, one identifier per layer, bottom-up filling, empty start,
    /// ±1 size transitions, and identifier-wise monotone changes.
    fn context_rows(&mut self) {
        let n_ids = self.ids.len();
        let last = self.max_length.saturating_sub(1);

        for p in 0..self.max_length {
            for t in 0..n_ids {
                let mut stacked: Vec<_> = (0..self.max_depth)
                    .map(|d| (self.ctx_var(p, d, t), 1.0))
                    .collect();
                stacked.push((self.x_var(p, t), 1.0));
                self.model.le(stacked, 1.0);
            }
            for d in 0..self.max_depth {
                let layer: Vec<_> = (0..n_ids).map(|t| (self.ctx_var(p, d, t), 1.0)).collect();
                self.model.le(layer, 1.0);
            }
            for d in 0..self.max_depth.saturating_sub(1) {
                let mut stacked_lower: Vec<_> =
                    (0..n_ids).map(|t| (self.ctx_var(p, d, t), 1.0)).collect();
                stacked_lower.extend((0..n_ids).map(|t| (self.ctx_var(p, d + 1, t), -1.0)));
                self.model.ge(stacked_lower, 0.0);
            }
        }

        let initial: Vec<_> = (0..self.max_depth)
            .flat_map(|d| (0..n_ids).map(move |t| (d, t)))
            .map(|(d, t)| (self.ctx_var(0, d, t), 1.0))
            .collect();
        self.model.eq(initial, 0.0);

        for p in 0..last {
            let mut delta = Vec::new();
            for d in 0..self.max_depth {
                for t in 0..n_ids {
                    delta.push((self.ctx_var(p + 1, d, t), 1.0));
                    delta.push((self.ctx_var(p, d, t), -1.0));
                }
            }
            delta.push((self.x_var(p, self.open()), -1.0));
            delta.push((self.x_var(p, self.close()), 1.0));
            self.model.eq(delta, 0.0);

            let open = self.x_var(p, self.open());
            let close = self.x_var(p, self.close());
            for d in 0..self.max_depth {
                for t in 0..n_ids {
                    let cur = self.ctx_var(p, d, t);
                    let next = self.ctx_var(p + 1, d, t);
                    // Entries drop only across a closing and appear only
                    // across an opening.
                    self.model
                        .ge(vec![(next, 1.0), (cur, -1.0), (close, 1.0)], 0.0);
                    self.model
                        .le(vec![(next, 1.0), (cur, -1.0), (open, -1.0)], 0.0);
                }
            }
        }
    }

    /// Activation: `a[p,t] = x[p,"("] ∧ x[p,t]`, and an activated identifier
    /// must be somewhere in the next slot's context.
    fn activation_rows(&mut self) {
        let n_ids = self.ids.len();
        for p in 0..self.max_length {
            let open = self.x_var(p, self.open());
            for t in 0..n_ids {
                let act = self.act_var(p, t);
                let x = self.x_var(p, t);
                self.model.le(vec![(act, 1.0), (open, -1.0)], 0.0);
                self.model.le(vec![(act, 1.0), (x, -1.0)], 0.0);
                self.model
                    .ge(vec![(act, 1.0), (open, -1.0), (x, -1.0)], -1.0);
            }
        }
        for p in 0..self.max_length.saturating_sub(1) {
            for t in 0..n_ids {
                let mut somewhere: Vec<_> = (0..self.max_depth)
                    .map(|d| (self.ctx_var(p + 1, d, t), 1.0))
                    .collect();
                somewhere.push((self.act_var(p, t), -1.0));
                self.model.ge(somewhere, 0.0);
            }
        }
    }

    /// Couples fact indicators to mentions: a mention is the conjunction of
    /// "outer identifier somewhere in the context" and "inner identifier
    /// emitted here"; `m[f]` is the disjunction of all mentions; true facts
    /// are forced on, false facts forced off.
    fn fact_rows(&mut self) {
        for f in 0..self.facts.len() {
            let FactVar {
                left,
                right,
                truth,
                var: m,
            } = self.facts[f];
            let mut all_mentions = vec![(m, 1.0)];
            for p in 0..self.max_length {
                for (orientation, (outer, inner)) in
                    [(left, right), (right, left)].into_iter().enumerate()
                {
                    let mention = self.mention_var(f, p, orientation);
                    let in_context: Vec<_> = (0..self.max_depth)
                        .map(|d| (self.ctx_var(p, d, outer), 1.0))
                        .collect();

                    let mut upper = vec![(mention, 1.0)];
                    upper.extend(in_context.iter().map(|&(v, _)| (v, -1.0)));
                    self.model.le(upper, 0.0);
                    self.model
                        .le(vec![(mention, 1.0), (self.x_var(p, inner), -1.0)], 0.0);

                    let mut lower = vec![(mention, 1.0)];
                    lower.extend(in_context.iter().map(|&(v, _)| (v, -1.0)));
                    lower.push((self.x_var(p, inner), -1.0));
                    self.model.ge(lower, -1.0);

                    self.model.ge(vec![(m, 1.0), (mention, -1.0)], 0.0);
                    all_mentions.push((mention, -1.0));
                }
            }
            self.model.le(all_mentions, 0.0);
            if truth {
                self.model.eq(vec![(m, 1.0)], 1.0);
            } else {
                self.model.eq(vec![(m, 1.0)], 0.0);
            }
        }
    }

    /// Exactly one written form per emitted identifier; shortcut forms
    /// require the shortcut to be introduced.
    fn representation_rows(&mut self) {
        for p in 0..self.max_length {
            for t in 0..self.ids.len() {
                let mut pick: Vec<_> = (0..self.rep_choices[t].len())
                    .map(|k| (self.rep_var(p, t, k), 1.0))
                    .collect();
                pick.push((self.x_var(p, t), -1.0));
                self.model.eq(pick, 0.0);

                for (k, choice) in self.rep_choices[t].clone().into_iter().enumerate() {
                    if let Some(s) = choice {
                        self.model
                            .le(vec![(self.rep_var(p, t, k), 1.0), (self.u[s], -1.0)], 0.0);
                    }
                }
            }
        }
    }

    /// Cuts that shrink the search tree: any context stack holds at most one
    /// table predicate and at most one column identifier, and the output
    /// starts with the first table's activated predicate.
    fn pruning_cuts(&mut self) {
        for p in 0..self.max_length {
            for range in [self.table_range.clone(), self.column_range.clone()] {
                let stacked: Vec<_> = range
                    .flat_map(|t| (0..self.max_depth).map(move |d| (d, t)))
                    .map(|(d, t)| (self.ctx_var(p, d, t), 1.0))
                    .collect();
                if !stacked.is_empty() {
                    self.model.le(stacked, 1.0);
                }
            }
        }
        if self.max_length > 0 && !self.table_range.is_empty() {
            let first = self.table_range.start;
            self.model.eq(vec![(self.x_var(0, first), 1.0)], 1.0);
            self.model
                .eq(vec![(self.x_var(0, self.open()), 1.0)], 1.0);
        }
    }

    /// Tokenized weight of every representation choice, parentheses, and
    /// shortcut introductions.
    fn objective(&mut self, tokenizer: &dyn Tokenizer, paren_weight: ParenWeight) -> Result<()> {
        let (open_w, close_w) = match paren_weight {
            ParenWeight::Unit => (1.0, 1.0),
            ParenWeight::Tokenized => (
                tokenizer.count_tokens("(")? as f64,
                tokenizer.count_tokens(")")? as f64,
            ),
        };

        // Weight of each written form, computed once per (identifier, form).
        let mut form_weights = Vec::with_capacity(self.ids.len());
        for (t, choices) in self.rep_choices.iter().enumerate() {
            let mut weights = Vec::with_capacity(choices.len());
            for choice in choices {
                let written = match choice {
                    None => self.ids[t].clone(),
                    Some(s) => self.shortcuts.apply(*s, &self.ids[t]),
                };
                weights.push(tokenizer.count_tokens(&written)? as f64);
            }
            form_weights.push(weights);
        }

        for p in 0..self.max_length {
            for (t, weights) in form_weights.iter().enumerate() {
                for (k, &w) in weights.iter().enumerate() {
                    self.model.add_objective(self.rep_var(p, t, k), w);
                }
            }
            self.model.add_objective(self.x_var(p, self.open()), open_w);
            self.model
                .add_objective(self.x_var(p, self.close()), close_w);
        }

        for s in 0..self.shortcuts.len() {
            if let Some(sentence) = self.shortcuts.introduction(s) {
                let w = tokenizer.count_tokens(&sentence)? as f64;
                self.model.add_objective(self.u[s], w);
            }
        }
        Ok(())
    }

    /// Hints: identifiers outside the `context_k` most frequent (by true-fact
    /// membership) are advised away from context depths above the first.
    fn add_hints(&mut self, context_k: usize) {
        let n_ids = self.ids.len();
        let mut freq = vec![0usize; n_ids];
        for fact in &self.facts {
            if fact.truth {
                freq[fact.left] += 1;
                freq[fact.right] += 1;
            }
        }
        let mut order: Vec<usize> = (0..n_ids).collect();
        order.sort_by(|&a, &b| freq[b].cmp(&freq[a]).then(a.cmp(&b)));
        let top: HashSet<usize> = order.into_iter().take(context_k).collect();

        for t in 0..n_ids {
            if top.contains(&t) {
                continue;
            }
            for p in 0..self.max_length {
                for d in 1..self.max_depth {
                    self.model.add_hint(self.ctx_var(p, d, t), 0.0);
                }
            }
        }
        debug!(hints = self.model.hints().len(), context_k, "added variable hints");
    }

    // -- Warm start ----------------------------------------------------------

    /// Converts the naive slot sequence into a complete assignment: token
    /// and representation choices, the derived context stacks, activations,
    /// mention and fact values. Every unmentioned variable is zero.
    pub fn seed_assignment(&self) -> Assignment {
        let mut a = Assignment::zeros(self.model.num_vars());
        let mut stack: Vec<usize> = Vec::new();
        let mut expressed = vec![false; self.facts.len()];

        for (p, slot) in self.seed_slots.iter().enumerate().take(self.max_length) {
            for (d, &tid) in stack.iter().enumerate().take(self.max_depth) {
                a.set(self.ctx_var(p, d, tid), 1.0);
            }

            let emitted = slot
                .ident
                .as_ref()
                .and_then(|ident| self.id_index.get(ident).copied());
            if let Some(tid) = emitted {
                a.set(self.x_var(p, tid), 1.0);
                a.set(self.rep_var(p, tid, 0), 1.0);
            }
            match slot.paren {
                Some(Paren::Open) => {
                    a.set(self.x_var(p, self.open()), 1.0);
                    if let Some(tid) = emitted {
                        a.set(self.act_var(p, tid), 1.0);
                    }
                }
                Some(Paren::Close) => a.set(self.x_var(p, self.close()), 1.0),
                None => {}
            }
            if slot.is_empty() {
                a.set(self.empty_var(p), 1.0);
            }

            for (f, fact) in self.facts.iter().enumerate() {
                let orientations = [(fact.left, fact.right), (fact.right, fact.left)];
                for (orientation, (outer, inner)) in orientations.into_iter().enumerate() {
                    if stack.contains(&outer) && emitted == Some(inner) {
                        a.set(self.mention_var(f, p, orientation), 1.0);
                        expressed[f] = true;
                    }
                }
            }

            match slot.paren {
                Some(Paren::Open) => {
                    if let Some(tid) = emitted {
                        stack.push(tid);
                    }
                }
                Some(Paren::Close) => {
                    stack.pop();
                }
                None => {}
            }
        }

        for p in self.seed_slots.len()..self.max_length {
            a.set(self.empty_var(p), 1.0);
        }
        for (f, fact) in self.facts.iter().enumerate() {
            if expressed[f] {
                a.set(fact.var, 1.0);
            }
        }
        a
    }

    /// Installs the seed as the model's warm start.
    fn install_start(&mut self) {
        let seed = self.seed_assignment();
        let start: Vec<_> = self
            .model
            .variables()
            .map(|v| (v, seed.get(v)))
            .collect();
        self.model.set_start(start);
    }

    // -- Assignment inspection ----------------------------------------------

    /// Number of slots the model budgets for.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Maximal context depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The interned identifier strings, in enumeration order.
    pub fn identifiers(&self) -> &[String] {
        &self.ids
    }

    /// The shortcut map this model was built against.
    pub fn shortcuts(&self) -> &ShortcutMap {
        &self.shortcuts
    }

    /// The naive slots the budget was derived from.
    pub fn seed_slots(&self) -> &[Slot] {
        &self.seed_slots
    }

    /// Identifier index emitted at `p`, if any.
    pub fn emitted(&self, assignment: &Assignment, p: usize) -> Option<usize> {
        (0..self.ids.len()).find(|&t| assignment.is_one(self.x_var(p, t)))
    }

    /// Parenthesis emitted at `p`, if any.
    pub fn paren_at(&self, assignment: &Assignment, p: usize) -> Option<Paren> {
        if assignment.is_one(self.x_var(p, self.open())) {
            Some(Paren::Open)
        } else if assignment.is_one(self.x_var(p, self.close())) {
            Some(Paren::Close)
        } else {
            None
        }
    }

    /// The context stack at `p`, bottom-up, as identifier indices.
    pub fn context_stack(&self, assignment: &Assignment, p: usize) -> Vec<usize> {
        let mut stack = Vec::new();
        for d in 0..self.max_depth {
            match (0..self.ids.len()).find(|&t| assignment.is_one(self.ctx_var(p, d, t))) {
                Some(t) => stack.push(t),
                None => break,
            }
        }
        stack
    }

    /// Representation choice (index into the identifier's choice list) used
    /// for an emitted identifier.
    pub fn rep_choice(&self, assignment: &Assignment, p: usize, t: usize) -> Option<usize> {
        (0..self.rep_choices[t].len()).find(|&k| assignment.is_one(self.rep_var(p, t, k)))
    }

    /// The written form of the identifier emitted at `p`, if any.
    pub fn written_form(&self, assignment: &Assignment, p: usize) -> Option<String> {
        let t = self.emitted(assignment, p)?;
        let choice = self.rep_choice(assignment, p, t).unwrap_or(0);
        Some(match self.rep_choices[t][choice] {
            None => self.ids[t].clone(),
            Some(s) => self.shortcuts.apply(s, &self.ids[t]),
        })
    }

    /// Shortcut indices whose introduction variable is on.
    pub fn introduced(&self, assignment: &Assignment) -> Vec<usize> {
        (0..self.u.len())
            .filter(|&s| assignment.is_one(self.u[s]))
            .collect()
    }

    /// Index of an identifier string, if it is part of this model.
    pub fn id_of(&self, ident: &str) -> Option<usize> {
        self.id_index.get(ident).copied()
    }

    pub(crate) fn x_var_id(&self, p: usize, t: usize) -> VarId {
        self.x_var(p, t)
    }

    pub(crate) fn rep_var_id(&self, p: usize, t: usize, choice: usize) -> VarId {
        self.rep_var(p, t, choice)
    }

    pub(crate) fn u_var_id(&self, s: usize) -> VarId {
        self.u[s]
    }

    pub(crate) fn rep_choices_of(&self, t: usize) -> &[Option<usize>] {
        &self.rep_choices[t]
    }

    /// Whether `{a, b}` is expressed at some position: one of them sits in
    /// the context stack while the other is emitted.
    pub fn fact_expressed(&self, assignment: &Assignment, a: &str, b: &str) -> bool {
        let (Some(&ia), Some(&ib)) = (self.id_index.get(a), self.id_index.get(b)) else {
            return false;
        };
        (0..self.max_length).any(|p| {
            let stack = self.context_stack(assignment, p);
            let emitted = self.emitted(assignment, p);
            (stack.contains(&ia) && emitted == Some(ib))
                || (stack.contains(&ib) && emitted == Some(ia))
        })
    }
}
