/// Ordered partition of the vertices
///
/// All vertices are stored in a single array `lab`, each cell is a
/// contiguous range of it and is identified by its start position.
/// Splitting a cell only rearranges its range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Partition {
    lab: Vec<usize>,
    pos: Vec<usize>,
    // start of the cell containing each vertex
    cell_of: Vec<usize>,
    // length of the cell starting at each position, undefined elsewhere
    len: Vec<usize>,
    cells: usize,
}

impl Partition {
    /// Partition with the given cells, in order
    ///
    /// The cells must be disjoint and cover `0..n`.
    pub(crate) fn new(cells: &[Vec<usize>], n: usize) -> Self {
        let mut lab = Vec::with_capacity(n);
        let mut cell_of = vec![0; n];
        let mut len = vec![0; n];
        for cell in cells {
            let start = lab.len();
            len[start] = cell.len();
            for &v in cell {
                cell_of[v] = start;
                lab.push(v);
            }
        }
        debug_assert_eq!(lab.len(), n);
        let mut pos = vec![0; n];
        for (p, &v) in lab.iter().enumerate() {
            pos[v] = p;
        }
        Self {
            lab,
            pos,
            cell_of,
            len,
            cells: cells.len(),
        }
    }

    pub(crate) fn cell_count(&self) -> usize {
        self.cells
    }

    pub(crate) fn is_discrete(&self) -> bool {
        self.cells == self.lab.len()
    }

    /// The vertices in partition order
    ///
    /// For a discrete partition this is the vertex ordering.
    pub(crate) fn order(&self) -> &[usize] {
        &self.lab
    }

    pub(crate) fn cell(&self, start: usize) -> &[usize] {
        &self.lab[start..start + self.len[start]]
    }

    pub(crate) fn cell_len(&self, start: usize) -> usize {
        self.len[start]
    }

    pub(crate) fn cell_start_of(&self, v: usize) -> usize {
        self.cell_of[v]
    }

    pub(crate) fn cell_starts(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(
            (!self.lab.is_empty()).then_some(0),
            move |&start| {
                let next = start + self.len[start];
                (next < self.lab.len()).then_some(next)
            },
        )
    }

    pub(crate) fn cell_sizes(&self) -> Vec<usize> {
        self.cell_starts().map(|start| self.len[start]).collect()
    }

    /// Start of the first cell with more than one vertex
    pub(crate) fn first_non_singleton(&self) -> Option<usize> {
        self.cell_starts().find(|&start| self.len[start] > 1)
    }

    /// Move `v` into a new singleton cell directly in front of the
    /// rest of its cell
    ///
    /// Returns the start of the new cell, which is the start of the
    /// old one.
    pub(crate) fn individualise(&mut self, v: usize) -> usize {
        let start = self.cell_of[v];
        let len = self.len[start];
        if len == 1 {
            return start;
        }
        let p = self.pos[v];
        let first = self.lab[start];
        self.lab.swap(start, p);
        self.pos[first] = p;
        self.pos[v] = start;
        self.len[start] = 1;
        self.len[start + 1] = len - 1;
        for &u in &self.lab[start + 1..start + len] {
            self.cell_of[u] = start + 1;
        }
        self.cells += 1;
        start
    }

    /// Replace the cell at `start` by consecutive cells of the given
    /// lengths, filled with `order`
    ///
    /// `order` must be a rearrangement of the cell. Returns the start
    /// positions of the new cells.
    pub(crate) fn split(
        &mut self,
        start: usize,
        order: &[usize],
        lengths: &[usize],
    ) -> Vec<usize> {
        debug_assert_eq!(order.len(), self.len[start]);
        debug_assert_eq!(lengths.iter().sum::<usize>(), order.len());
        self.lab[start..start + order.len()].copy_from_slice(order);
        let mut starts = Vec::with_capacity(lengths.len());
        let mut offset = start;
        for &len in lengths {
            self.len[offset] = len;
            for p in offset..offset + len {
                let v = self.lab[p];
                self.pos[v] = p;
                self.cell_of[v] = offset;
            }
            starts.push(offset);
            offset += len;
        }
        self.cells += lengths.len() - 1;
        starts
    }
}
