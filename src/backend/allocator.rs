use crate::backend::register::{Reg, ALLOCATABLE};
use crate::backend::spot::Spot;
use crate::core::il::{ILCode, ValueId, ValueKind};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use tracing::trace;

#[derive(Debug, Clone, Copy, Default)]
pub struct AllocatorConfig {
    /// put every variable and temporary on the stack
    pub variables_on_stack: bool,
}

/// how values were placed, 4 --show-reg-alloc-perf
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocationStats {
    pub in_registers: usize,
    pub on_stack: usize,
    pub spilled: usize,
    pub literals: usize,
    pub symbols: usize,
}

impl fmt::Display for AllocationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let placed = self.in_registers + self.on_stack;
        let ratio = if placed == 0 {
            0.0
        } else {
            self.in_registers as f64 * 100.0 / placed as f64
        };
        writeln!(f, "values in registers: {}", self.in_registers)?;
        writeln!(f, "values on stack:     {} ({} spilled)", self.on_stack, self.spilled)?;
        writeln!(f, "literals:            {}", self.literals)?;
        writeln!(f, "symbols:             {}", self.symbols)?;
        write!(f, "register ratio:      {:.1}%", ratio)
    }
}

/// value 2 spot mapping, fixed once allocation is done
#[derive(Debug, Clone, Default)]
pub struct SpotMap {
    spots: HashMap<ValueId, Spot>,
    frame_size: u64,
}

impl SpotMap {
    pub fn get(&self, id: ValueId) -> Option<&Spot> {
        self.spots.get(&id)
    }

    /// stack bytes below rbp, 16 byte aligned
    pub fn frame_size(&self) -> u64 {
        self.frame_size
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct Interval {
    id: ValueId,
    start: usize,
    end: usize,
}

/// linear scan over command index live ranges.
///
/// jumps only go forward so a value's first and last mention bound its life
pub fn allocate(il: &ILCode, config: &AllocatorConfig) -> (SpotMap, AllocationStats) {
    let mut ranges: BTreeMap<ValueId, (usize, usize)> = BTreeMap::new();
    let mut escaped: HashSet<ValueId> = HashSet::new();
    for (i, command) in il.commands.iter().enumerate() {
        for id in command.inputs().into_iter().chain(command.outputs()) {
            ranges
                .entry(id)
                .and_modify(|r| r.1 = i)
                .or_insert((i, i));
        }
        escaped.extend(command.references());
    }

    let mut map = SpotMap::default();
    let mut stats = AllocationStats::default();
    let mut stack_top: u64 = 0;
    let mut intervals = Vec::new();

    for (&id, &(start, end)) in &ranges {
        let Some(info) = il.value(id) else { continue };
        let spot = match &info.kind {
            ValueKind::Literal(lit) => {
                stats.literals += 1;
                Some(Spot::Literal(*lit))
            }
            ValueKind::StringLiteral(n) => {
                stats.symbols += 1;
                Some(Spot::symbol(format!("__strlit{}", n)))
            }
            ValueKind::Extern(name) => {
                stats.symbols += 1;
                Some(Spot::symbol(name.clone()))
            }
            ValueKind::Temp | ValueKind::Local(_) => {
                let size = info.ctype.size();
                let scalar = matches!(size, 1 | 2 | 4 | 8) && !info.ctype.is_array();
                if config.variables_on_stack || !scalar || escaped.contains(&id) {
                    stats.on_stack += 1;
                    Some(stack_slot(&mut stack_top, size))
                } else {
                    intervals.push(Interval { id, start, end });
                    None
                }
            }
        };
        if let Some(spot) = spot {
            trace!(value = %id, spot = %spot, "fixed spot");
            map.spots.insert(id, spot);
        }
    }

    // ranges come out of the btree in id order, scan wants start order
    intervals.sort_by_key(|iv| (iv.start, iv.id));
    let mut active: Vec<(Interval, Reg)> = Vec::new();
    let mut free: Vec<Reg> = ALLOCATABLE.iter().rev().copied().collect();

    for iv in intervals {
        active.retain(|(other, reg)| {
            if other.end < iv.start {
                free.push(*reg);
                false
            } else {
                true
            }
        });

        let spot = match free.pop() {
            Some(reg) => {
                active.push((iv, reg));
                stats.in_registers += 1;
                Spot::Register(reg)
            }
            None => {
                stats.on_stack += 1;
                stats.spilled += 1;
                let size = il.ctype(iv.id).map_or(8, |c| c.size());
                stack_slot(&mut stack_top, size)
            }
        };
        trace!(value = %iv.id, spot = %spot, start = iv.start, end = iv.end, "allocated");
        map.spots.insert(iv.id, spot);
    }

    map.frame_size = (stack_top + 15) / 16 * 16;
    (map, stats)
}

/// next rbp relative slot, aligned 2 its size up 2 8 bytes
fn stack_slot(top: &mut u64, size: u64) -> Spot {
    let size = size.max(1);
    let align = size.min(8).next_power_of_two();
    *top = (*top + size + align - 1) / align * align;
    Spot::stack(-(*top as i64))
}
