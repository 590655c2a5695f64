//! Pass invalidation as an explicit dependency chain.
//!
//! noise synthesis ⇒ heightmap evolution ⇒ intersection ⇒ composite.
//! Completing a pass clears its own flag and marks the pass downstream of it.
//! Composite has no flag: it runs every tick.

/// One stage of the per-tick render pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    NoiseSynthesis,
    HeightmapEvolution,
    Intersection,
    Composite,
}

impl Pass {
    /// All passes in the order a tick runs them.
    pub const ORDER: [Pass; 4] = [
        Pass::NoiseSynthesis,
        Pass::HeightmapEvolution,
        Pass::Intersection,
        Pass::Composite,
    ];

    /// Position in [`Pass::ORDER`].
    pub fn index(self) -> usize {
        match self {
            Pass::NoiseSynthesis => 0,
            Pass::HeightmapEvolution => 1,
            Pass::Intersection => 2,
            Pass::Composite => 3,
        }
    }

    /// The pass whose input this pass produces.
    pub fn downstream(self) -> Option<Pass> {
        match self {
            Pass::NoiseSynthesis => Some(Pass::HeightmapEvolution),
            Pass::HeightmapEvolution => Some(Pass::Intersection),
            Pass::Intersection => Some(Pass::Composite),
            Pass::Composite => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Pass::NoiseSynthesis => "noise_synthesis",
            Pass::HeightmapEvolution => "heightmap_evolution",
            Pass::Intersection => "intersection",
            Pass::Composite => "composite",
        }
    }
}

/// Stale-output flags for the cached passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyFlags {
    pub regenerate_noise: bool,
    pub refresh_heightmap: bool,
    pub refresh_depth: bool,
}

impl DirtyFlags {
    /// Every cached pass stale, as on the first frame.
    pub fn primed() -> Self {
        Self {
            regenerate_noise: true,
            refresh_heightmap: true,
            refresh_depth: true,
        }
    }

    pub fn mark(&mut self, pass: Pass) {
        match pass {
            Pass::NoiseSynthesis => self.regenerate_noise = true,
            Pass::HeightmapEvolution => self.refresh_heightmap = true,
            Pass::Intersection => self.refresh_depth = true,
            Pass::Composite => {}
        }
    }

    pub fn is_dirty(&self, pass: Pass) -> bool {
        match pass {
            Pass::NoiseSynthesis => self.regenerate_noise,
            Pass::HeightmapEvolution => self.refresh_heightmap,
            Pass::Intersection => self.refresh_depth,
            Pass::Composite => true,
        }
    }

    /// Record that `pass` ran: clear its flag and invalidate its consumer.
    pub fn complete(&mut self, pass: Pass) {
        match pass {
            Pass::NoiseSynthesis => self.regenerate_noise = false,
            Pass::HeightmapEvolution => self.refresh_heightmap = false,
            Pass::Intersection => self.refresh_depth = false,
            Pass::Composite => {}
        }
        if let Some(next) = pass.downstream() {
            self.mark(next);
        }
    }

    /// True when only the composite pass would run.
    pub fn is_clean(&self) -> bool {
        !self.regenerate_noise && !self.refresh_heightmap && !self.refresh_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_order() {
        for (i, pass) in Pass::ORDER.into_iter().enumerate() {
            assert_eq!(pass.index(), i, "{}", pass.label());
        }
    }

    #[test]
    fn test_primed_marks_everything() {
        let flags = DirtyFlags::primed();
        for pass in Pass::ORDER {
            assert!(flags.is_dirty(pass), "{} should be dirty", pass.label());
        }
    }

    #[test]
    fn test_composite_always_dirty() {
        let mut flags = DirtyFlags::default();
        assert!(flags.is_clean());
        assert!(flags.is_dirty(Pass::Composite));
        flags.complete(Pass::Composite);
        assert!(flags.is_dirty(Pass::Composite));
    }

    #[test]
    fn test_complete_marks_downstream() {
        let mut flags = DirtyFlags::default();
        flags.mark(Pass::NoiseSynthesis);

        flags.complete(Pass::NoiseSynthesis);
        assert!(!flags.regenerate_noise);
        assert!(flags.refresh_heightmap);
        assert!(!flags.refresh_depth);

        flags.complete(Pass::HeightmapEvolution);
        assert!(!flags.refresh_heightmap);
        assert!(flags.refresh_depth);

        flags.complete(Pass::Intersection);
        assert!(flags.is_clean());
    }

    #[test]
    fn test_chain_is_acyclic() {
        let mut steps = 0;
        let mut pass = Some(Pass::NoiseSynthesis);
        while let Some(p) = pass {
            assert_eq!(p, Pass::ORDER[steps]);
            pass = p.downstream();
            steps += 1;
        }
        assert_eq!(steps, Pass::ORDER.len());
    }
}
