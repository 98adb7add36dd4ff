//! Build configurations and the project that owns them.
//!
//! Configurations form a tree: a configuration may name a parent, and its
//! assembler cells inherit from the parent's. The parent must already exist
//! when the child is added and can never be changed afterwards, so the tree
//! (and every cell master chain inside it) is acyclic by construction.

use log::debug;

use crate::arena::{Arena, Id};
use crate::cell::CellStore;
use crate::extension::{AuxObject, AuxPool};
use crate::paths::ExecEnv;
use crate::tool::{
    AssemblerConfiguration, CustomToolConfiguration, MakefileConfiguration, PreBuildConfiguration,
};
use crate::toolchain::CompilerType;
use crate::{Error, Result};

pub type ConfId = Id<BuildConfiguration>;

#[derive(Debug)]
pub struct BuildConfiguration {
    pub name: String,
    /// Directory relative settings resolve against.
    pub base_dir: String,
    pub env: ExecEnv,
    pub compiler: CompilerType,
    parent: Option<ConfId>,
    pub aux: AuxPool,
}

impl BuildConfiguration {
    /// A configuration with an empty aux pool.
    pub fn new(
        name: impl Into<String>,
        base_dir: impl Into<String>,
        env: ExecEnv,
        compiler: CompilerType,
        parent: Option<ConfId>,
    ) -> Self {
        Self {
            name: name.into(),
            base_dir: base_dir.into(),
            env,
            compiler,
            parent,
            aux: AuxPool::new(),
        }
    }

    pub fn parent(&self) -> Option<ConfId> {
        self.parent
    }
}

#[derive(Debug, Default)]
pub struct Project {
    pub cells: CellStore,
    configurations: Arena<BuildConfiguration>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a configuration with the default tool blocks. With a parent,
    /// the assembler block inherits from the parent's.
    pub fn add_configuration(
        &mut self,
        name: &str,
        base_dir: &str,
        env: ExecEnv,
        compiler: CompilerType,
        parent: Option<ConfId>,
    ) -> Result<ConfId> {
        if self.find(name).is_some() {
            return Err(Error::DuplicateConfiguration(name.to_string()));
        }
        if let Some(parent) = parent
            && !self.configurations.contains(parent)
        {
            return Err(Error::DetachedConfiguration);
        }

        let id = self.configurations.insert(BuildConfiguration::new(
            name, base_dir, env, compiler, parent,
        ));

        let parent_asm = parent.and_then(|p| {
            let conf = self.configurations.get(p)?;
            Some((p, conf.aux.get::<AssemblerConfiguration>()?))
        });
        let mut pool = AuxPool::new();
        pool.register(AssemblerConfiguration::new(&mut self.cells, id, parent_asm))?;
        pool.register(MakefileConfiguration::new(&mut self.cells, id))?;
        pool.register(PreBuildConfiguration::new(&mut self.cells, id))?;
        pool.register(CustomToolConfiguration::new(&mut self.cells, id))?;
        self.configurations[id].aux = pool;

        debug!("event=configuration_added name={name} parent={parent:?}");
        Ok(id)
    }

    /// Deep copy of `source` under a new name, with every aux object
    /// rebound to the copy. The copy keeps `source`'s parent, and its cells
    /// keep their masters.
    pub fn clone_configuration(&mut self, source: ConfId, name: &str) -> Result<ConfId> {
        if self.find(name).is_some() {
            return Err(Error::DuplicateConfiguration(name.to_string()));
        }
        let original = self
            .configurations
            .get(source)
            .ok_or(Error::DetachedConfiguration)?;
        let copy = BuildConfiguration::new(
            name,
            original.base_dir.clone(),
            original.env.clone(),
            original.compiler,
            original.parent,
        );
        let id = self.configurations.insert(copy);

        let pool = self.configurations[source]
            .aux
            .clone_for(&mut self.cells, id);
        self.configurations[id].aux = pool;

        debug!("event=configuration_cloned source={source:?} name={name}");
        Ok(id)
    }

    /// Commits `source` into `target` aux object by aux object. Name,
    /// base directory and parent of `target` stay as they are.
    pub fn assign_configuration(&mut self, target: ConfId, source: ConfId) -> Result<()> {
        if target == source {
            return Ok(());
        }
        let (target_conf, source_conf) = self
            .configurations
            .get_pair_mut(target, source)
            .ok_or(Error::DetachedConfiguration)?;
        target_conf.aux.assign_from(&mut self.cells, &source_conf.aux);
        Ok(())
    }

    /// Removes a configuration and releases its cells. Cells of other
    /// configurations that inherited from them stop inheriting.
    pub fn remove_configuration(&mut self, id: ConfId) -> Result<BuildConfiguration> {
        let conf = self
            .configurations
            .remove(id)
            .ok_or(Error::DetachedConfiguration)?;
        conf.aux.release(&mut self.cells);
        debug!(
            "event=configuration_removed name={} live_cells={}",
            conf.name,
            self.cells.len()
        );
        Ok(conf)
    }

    /// Resets every cell of the configuration to its default.
    pub fn initialize_configuration(&mut self, id: ConfId) -> Result<()> {
        let conf = self
            .configurations
            .get_mut(id)
            .ok_or(Error::DetachedConfiguration)?;
        conf.aux.initialize_all(&mut self.cells);
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<ConfId> {
        self.configurations
            .iter()
            .find(|(_, conf)| conf.name == name)
            .map(|(id, _)| id)
    }

    /// Like [`find`](Project::find), as an error for callers that need one.
    pub fn lookup(&self, name: &str) -> Result<ConfId> {
        self.find(name)
            .ok_or_else(|| Error::UnknownConfiguration(name.to_string()))
    }

    pub fn configuration(&self, id: ConfId) -> Option<&BuildConfiguration> {
        self.configurations.get(id)
    }

    pub fn configuration_mut(&mut self, id: ConfId) -> Option<&mut BuildConfiguration> {
        self.configurations.get_mut(id)
    }

    pub fn configurations(&self) -> impl Iterator<Item = (ConfId, &BuildConfiguration)> {
        self.configurations.iter()
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    pub fn aux<T: AuxObject>(&self, id: ConfId) -> Option<&T> {
        self.configurations.get(id)?.aux.get::<T>()
    }

    /// Number of live ancestors.
    pub fn depth(&self, id: ConfId) -> usize {
        let mut depth = 0;
        let mut next = self.configurations.get(id).and_then(|c| c.parent);
        while let Some(parent) = next {
            let Some(conf) = self.configurations.get(parent) else {
                break;
            };
            depth += 1;
            next = conf.parent;
        }
        depth
    }

    /// Whether any cell of the configuration carries an override.
    pub fn modified(&self, id: ConfId) -> bool {
        self.configurations
            .get(id)
            .is_some_and(|conf| conf.aux.modified(&self.cells))
    }

    pub fn has_changed(&self) -> bool {
        self.configurations.iter().any(|(_, conf)| conf.aux.has_changed())
    }

    /// Clears every aux change flag after the project has been written.
    pub fn mark_saved(&mut self) {
        for (_, conf) in self.configurations.iter_mut() {
            conf.aux.clear_changed();
        }
    }

    /// Clears the dirty flags of one configuration once its consumers have
    /// picked up the new values.
    pub fn clear_dirty(&mut self, id: ConfId) -> Result<()> {
        let conf = self
            .configurations
            .get_mut(id)
            .ok_or(Error::DetachedConfiguration)?;
        conf.aux.clear_dirty(&mut self.cells);
        Ok(())
    }

    /// Restores one aux object of a configuration from a persisted table.
    pub fn read_aux(&mut self, id: ConfId, aux_id: &str, table: &toml::Table) -> Result<bool> {
        let conf = self
            .configurations
            .get_mut(id)
            .ok_or(Error::DetachedConfiguration)?;
        conf.aux.read(&mut self.cells, aux_id, table)
    }

    /// Sets `aux.cell` from user text.
    pub fn set_field(&mut self, id: ConfId, path: &str, text: &str) -> Result<()> {
        let conf = self
            .configurations
            .get_mut(id)
            .ok_or(Error::DetachedConfiguration)?;
        conf.aux.set_field(&mut self.cells, path, text)
    }

    pub fn reset_field(&mut self, id: ConfId, path: &str) -> Result<()> {
        let conf = self
            .configurations
            .get_mut(id)
            .ok_or(Error::DetachedConfiguration)?;
        conf.aux.reset_field(&mut self.cells, path)
    }

    /// Runs `edit` on a throwaway copy of `id` and commits the copy back
    /// if `edit` succeeds. On failure the configuration is untouched.
    pub fn edit<F>(&mut self, id: ConfId, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Project, ConfId) -> Result<()>,
    {
        let name = self
            .configurations
            .get(id)
            .map(|conf| format!("{}~edit", conf.name))
            .ok_or(Error::DetachedConfiguration)?;
        let copy = self.clone_configuration(id, &name)?;
        let outcome = edit(self, copy);
        if outcome.is_ok() {
            self.assign_configuration(id, copy)?;
        }
        self.remove_configuration(copy)?;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(project: &mut Project, name: &str, parent: Option<ConfId>) -> ConfId {
        project
            .add_configuration(name, "/p", ExecEnv::Local, CompilerType::GCC, parent)
            .unwrap()
    }

    #[test]
    fn test_add_registers_default_blocks() {
        let mut project = Project::new();
        let id = local(&mut project, "Debug", None);
        let ids: Vec<_> = project.configuration(id).unwrap().aux.ids().collect();
        assert_eq!(ids, vec!["assembler", "custom_tool", "makefile", "pre_build"]);
        assert!(!project.modified(id));
        assert_eq!(project.find("Debug"), Some(id));
    }

    #[test]
    fn test_duplicate_and_stale_parent_rejected() {
        let mut project = Project::new();
        let id = local(&mut project, "Debug", None);
        let dup = project.add_configuration("Debug", ".", ExecEnv::Local, CompilerType::GCC, None);
        assert!(matches!(dup, Err(Error::DuplicateConfiguration(_))));

        project.remove_configuration(id).unwrap();
        let orphan =
            project.add_configuration("Child", ".", ExecEnv::Local, CompilerType::GCC, Some(id));
        assert!(matches!(orphan, Err(Error::DetachedConfiguration)));
        assert!(matches!(project.lookup("Debug"), Err(Error::UnknownConfiguration(_))));
    }

    #[test]
    fn test_edit_commits_on_success_only() {
        let mut project = Project::new();
        let id = local(&mut project, "Debug", None);
        let cells_before = project.cells.len();

        project
            .edit(id, |p, copy| p.set_field(copy, "makefile.output", "dist/app"))
            .unwrap();
        let output = project.aux::<MakefileConfiguration>(id).unwrap().output;
        assert_eq!(project.cells.value(output), "dist/app");

        let failed = project.edit(id, |p, copy| {
            p.set_field(copy, "makefile.output", "other")?;
            p.set_field(copy, "makefile.nope", "x")
        });
        assert!(failed.is_err());
        assert_eq!(project.cells.value(output), "dist/app");

        assert_eq!(project.len(), 1);
        assert_eq!(project.cells.len(), cells_before);
    }

    #[test]
    fn test_remove_parent_severs_inheritance() {
        let mut project = Project::new();
        let base = local(&mut project, "Base", None);
        let child = local(&mut project, "Child", Some(base));
        project.set_field(base, "assembler.strip", "true").unwrap();

        let strip = project.aux::<AssemblerConfiguration>(child).unwrap().strip;
        assert!(*project.cells.value(strip));
        assert_eq!(project.depth(child), 1);

        project.remove_configuration(base).unwrap();
        assert!(!*project.cells.value(strip));
        assert_eq!(project.depth(child), 0);
    }

    #[test]
    fn test_mark_saved_clears_change_flags() {
        let mut project = Project::new();
        let id = local(&mut project, "Debug", None);
        project
            .edit(id, |p, copy| p.set_field(copy, "pre_build.command", "make gen"))
            .unwrap();
        assert!(project.has_changed());
        project.mark_saved();
        assert!(!project.has_changed());
        assert!(project.modified(id));
    }

    #[test]
    fn test_repeated_edit_with_same_value_is_not_a_change() {
        let mut project = Project::new();
        let id = local(&mut project, "Debug", None);
        project
            .edit(id, |p, copy| p.set_field(copy, "assembler.strip", "true"))
            .unwrap();
        assert!(project.has_changed());
        project.mark_saved();

        project
            .edit(id, |p, copy| p.set_field(copy, "assembler.strip", "true"))
            .unwrap();
        assert!(!project.has_changed());

        project
            .edit(id, |p, copy| p.set_field(copy, "assembler.strip", "false"))
            .unwrap();
        assert!(project.has_changed());
    }

    #[test]
    fn test_initialize_configuration() {
        let mut project = Project::new();
        let id = local(&mut project, "Debug", None);
        project.set_field(id, "assembler.include_directories", "a, b").unwrap();
        project.set_field(id, "custom_tool.outputs", "x.o").unwrap();
        assert!(project.modified(id));

        project.initialize_configuration(id).unwrap();
        assert!(!project.modified(id));
    }
}
