use crate::{
    foundation::core::{ItemId, Point, Size},
    store::hierarchy::Hierarchy,
};

/// Parent→child segment of the laid-out tree.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TreeLink {
    pub parent: ItemId,
    pub child: ItemId,
    pub kind: Option<String>,
    pub from: Point,
    pub to: Point,
}

/// Output of the tree provider, indexed like the hierarchy arena.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeGeometry {
    positions: Vec<Point>,
    links: Vec<TreeLink>,
    index: std::collections::HashMap<ItemId, usize>,
}

impl TreeGeometry {
    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn position_of(&self, id: &str) -> Option<Point> {
        self.index.get(id).map(|&i| self.positions[i])
    }

    pub fn links(&self) -> &[TreeLink] {
        &self.links
    }
}

// Working record of the Buchheim walk. Field names follow the paper: `z` prelim, `m` modifier,
// `c` change, `s` shift, `t` thread, `a` ancestor, `i` sibling number.
#[derive(Clone, Debug)]
struct Walk {
    parent: usize,
    children: Vec<usize>,
    default_ancestor: Option<usize>,
    a: usize,
    z: f64,
    m: f64,
    c: f64,
    s: f64,
    t: Option<usize>,
    i: usize,
}

struct Tidy {
    w: Vec<Walk>,
}

impl Tidy {
    // siblings share a parent → 1, cousins → 2
    fn separation(&self, a: usize, b: usize) -> f64 {
        if self.w[a].parent == self.w[b].parent {
            1.0
        } else {
            2.0
        }
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.w[v].children.first().copied().or(self.w[v].t)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.w[v].children.last().copied().or(self.w[v].t)
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let change = shift / (self.w[wp].i as f64 - self.w[wm].i as f64);
        self.w[wp].c -= change;
        self.w[wp].s += shift;
        self.w[wm].c += change;
        self.w[wp].z += shift;
        self.w[wp].m += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        let children = self.w[v].children.clone();
        for &c in children.iter().rev() {
            self.w[c].z += shift;
            self.w[c].m += shift;
            change += self.w[c].c;
            shift += self.w[c].s + change;
        }
    }

    fn next_ancestor(&self, vim: usize, v: usize, ancestor: usize) -> usize {
        let a = self.w[vim].a;
        if self.w[a].parent == self.w[v].parent {
            a
        } else {
            ancestor
        }
    }

    fn first_walk(&mut self, v: usize) {
        let parent = self.w[v].parent;
        let left = match self.w[v].i {
            0 => None,
            i => Some(self.w[parent].children[i - 1]),
        };

        let ends = (
            self.w[v].children.first().copied(),
            self.w[v].children.last().copied(),
        );
        if let (Some(first), Some(last)) = ends {
            self.execute_shifts(v);
            let midpoint = (self.w[first].z + self.w[last].z) / 2.0;
            match left {
                Some(w) => {
                    self.w[v].z = self.w[w].z + self.separation(v, w);
                    self.w[v].m = self.w[v].z - midpoint;
                }
                None => self.w[v].z = midpoint,
            }
        } else if let Some(w) = left {
            self.w[v].z = self.w[w].z + self.separation(v, w);
        }

        let fallback = self.w[parent].children[0];
        let ancestor = self.w[parent].default_ancestor.unwrap_or(fallback);
        let ancestor = self.apportion(v, left, ancestor);
        self.w[parent].default_ancestor = Some(ancestor);
    }

    fn apportion(&mut self, v: usize, left: Option<usize>, mut ancestor: usize) -> usize {
        let Some(w) = left else {
            return ancestor;
        };

        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = self.w[self.w[v].parent].children[0];
        let mut sip = self.w[vip].m;
        let mut sop = self.w[vop].m;
        let mut sim = self.w[vim].m;
        let mut som = self.w[vom].m;

        let mut next_im = self.next_right(vim);
        let mut next_ip = self.next_left(vip);
        while let (Some(im), Some(ip)) = (next_im, next_ip) {
            vim = im;
            vip = ip;
            // outer contours follow the inner ones, so they exist whenever the inner ones do
            vom = self.next_left(vom).unwrap_or(vom);
            vop = self.next_right(vop).unwrap_or(vop);
            self.w[vop].a = v;
            let shift = self.w[vim].z + sim - self.w[vip].z - sip + self.separation(vim, vip);
            if shift > 0.0 {
                let anc = self.next_ancestor(vim, v, ancestor);
                self.move_subtree(anc, v, shift);
                sip += shift;
                sop += shift;
            }
            sim += self.w[vim].m;
            sip += self.w[vip].m;
            som += self.w[vom].m;
            sop += self.w[vop].m;

            next_im = self.next_right(vim);
            next_ip = self.next_left(vip);
        }

        if let Some(im) = next_im
            && self.next_right(vop).is_none()
        {
            self.w[vop].t = Some(im);
            self.w[vop].m += sim - sop;
        }
        if let Some(ip) = next_ip
            && self.next_left(vom).is_none()
        {
            self.w[vom].t = Some(ip);
            self.w[vom].m += sip - som;
            ancestor = v;
        }
        ancestor
    }
}

/// Deterministic tidy-tree layout inside a fixed size budget.
///
/// Parents sit above children, depth maps linearly onto y, and the leftmost and rightmost nodes
/// span the whole width (a lone root lands in the middle).
#[tracing::instrument(skip_all, fields(nodes = hierarchy.len()))]
pub fn tidy_tree(hierarchy: &Hierarchy, size: Size) -> TreeGeometry {
    let n = hierarchy.len();
    let virtual_root = n;

    let mut w: Vec<Walk> = hierarchy
        .nodes()
        .iter()
        .enumerate()
        .map(|(idx, node)| Walk {
            parent: node.parent.unwrap_or(virtual_root),
            children: node.children.clone(),
            default_ancestor: None,
            a: idx,
            z: 0.0,
            m: 0.0,
            c: 0.0,
            s: 0.0,
            t: None,
            i: 0,
        })
        .collect();
    w.push(Walk {
        parent: virtual_root,
        children: if n > 0 { vec![0] } else { Vec::new() },
        default_ancestor: None,
        a: virtual_root,
        z: 0.0,
        m: 0.0,
        c: 0.0,
        s: 0.0,
        t: None,
        i: 0,
    });
    for idx in 0..n {
        for (i, &c) in hierarchy.node(idx).children.iter().enumerate() {
            w[c].i = i;
        }
    }

    let mut tidy = Tidy { w };
    if n > 0 {
        for v in postorder(hierarchy) {
            tidy.first_walk(v);
        }
        tidy.w[virtual_root].m = -tidy.w[0].z;
    }

    // Arena order is pre-order, so parents are final before their children.
    let mut x = vec![0.0; n];
    for v in 0..n {
        let p = tidy.w[v].parent;
        x[v] = tidy.w[v].z + tidy.w[p].m;
        tidy.w[v].m += tidy.w[p].m;
    }

    let mut positions = vec![Point::ZERO; n];
    if n > 0 {
        let (mut left, mut right) = (0, 0);
        for v in 0..n {
            if x[v] < x[left] {
                left = v;
            }
            if x[v] > x[right] {
                right = v;
            }
        }
        let s = if left == right {
            1.0
        } else {
            tidy.separation(left, right) / 2.0
        };
        let tx = s - x[left];
        let kx = size.width / (x[right] + s + tx);
        let ky = size.height / (hierarchy.max_depth().max(1) as f64);
        for v in 0..n {
            positions[v] = Point::new((x[v] + tx) * kx, hierarchy.node(v).depth as f64 * ky);
        }
    }

    let links = hierarchy
        .links()
        .map(|(p, c)| TreeLink {
            parent: hierarchy.node(p).item.clone(),
            child: hierarchy.node(c).item.clone(),
            kind: hierarchy.link_kind(p, c).map(str::to_string),
            from: positions[p],
            to: positions[c],
        })
        .collect();

    let index = hierarchy
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, node)| (node.item.clone(), i))
        .collect();

    TreeGeometry {
        positions,
        links,
        index,
    }
}

fn postorder(hierarchy: &Hierarchy) -> Vec<usize> {
    let mut out = Vec::with_capacity(hierarchy.len());
    let mut stack = vec![(0usize, false)];
    while let Some((v, expanded)) = stack.pop() {
        if expanded {
            out.push(v);
            continue;
        }
        stack.push((v, true));
        for &c in hierarchy.node(v).children.iter().rev() {
            stack.push((c, false));
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/layout/tree.rs"]
mod tests;
