//! Breakpoints, layouts and per-breakpoint component configuration

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Width range `[min_width, max_width]` in pixels; `max_width` None is open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub name: String,
    pub min_width: u32,
    pub max_width: Option<u32>,
}

impl Breakpoint {
    pub fn new(name: impl Into<String>, min_width: u32, max_width: Option<u32>) -> Self {
        Self {
            name: name.into(),
            min_width,
            max_width,
        }
    }

    pub fn contains(&self, width: u32) -> bool {
        width >= self.min_width && self.max_width.map_or(true, |max| width <= max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub name: String,
    pub columns: u32,
    pub sidebar: bool,
    pub font_scale: f32,
}

/// Component settings for one breakpoint, free-form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfig {
    pub component: String,
    pub breakpoint: String,
    pub props: serde_json::Value,
}

#[derive(Debug)]
pub struct ResponsiveRegistry {
    breakpoints: BTreeMap<String, Breakpoint>,
    layouts: BTreeMap<String, Layout>,
    /// breakpoint -> component -> config
    components: HashMap<String, BTreeMap<String, ComponentConfig>>,
}

impl Default for ResponsiveRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.add_breakpoint(Breakpoint::new("mobile", 0, Some(767)));
        registry.add_breakpoint(Breakpoint::new("tablet", 768, Some(1023)));
        registry.add_breakpoint(Breakpoint::new("desktop", 1024, None));
        registry
    }
}

impl ResponsiveRegistry {
    /// Registry with the mobile, tablet and desktop breakpoints
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty() -> Self {
        Self {
            breakpoints: BTreeMap::new(),
            layouts: BTreeMap::new(),
            components: HashMap::new(),
        }
    }

    pub fn add_breakpoint(&mut self, breakpoint: Breakpoint) {
        self.breakpoints.insert(breakpoint.name.clone(), breakpoint);
    }

    pub fn update_breakpoint(&mut self, breakpoint: Breakpoint) -> bool {
        if !self.breakpoints.contains_key(&breakpoint.name) {
            return false;
        }
        self.add_breakpoint(breakpoint);
        true
    }

    /// Remove a breakpoint and the component configs attached to it
    pub fn remove_breakpoint(&mut self, name: &str) -> Option<Breakpoint> {
        self.components.remove(name);
        self.breakpoints.remove(name)
    }

    /// Breakpoints sorted by minimum width
    pub fn breakpoints(&self) -> Vec<&Breakpoint> {
        let mut list: Vec<&Breakpoint> = self.breakpoints.values().collect();
        list.sort_by_key(|b| b.min_width);
        list
    }

    /// Breakpoint covering `width`. With overlapping ranges the one with the
    /// highest minimum wins.
    pub fn breakpoint_for_width(&self, width: u32) -> Option<&Breakpoint> {
        self.breakpoints
            .values()
            .filter(|b| b.contains(width))
            .max_by_key(|b| b.min_width)
    }

    pub fn add_layout(&mut self, layout: Layout) {
        self.layouts.insert(layout.name.clone(), layout);
    }

    pub fn update_layout(&mut self, layout: Layout) -> bool {
        if !self.layouts.contains_key(&layout.name) {
            return false;
        }
        self.add_layout(layout);
        true
    }

    pub fn remove_layout(&mut self, name: &str) -> Option<Layout> {
        self.layouts.remove(name)
    }

    pub fn layout(&self, name: &str) -> Option<&Layout> {
        self.layouts.get(name)
    }

    pub fn layouts(&self) -> Vec<&Layout> {
        self.layouts.values().collect()
    }

    pub fn set_component_config(&mut self, config: ComponentConfig) {
        self.components
            .entry(config.breakpoint.clone())
            .or_default()
            .insert(config.component.clone(), config);
    }

    pub fn remove_component_config(&mut self, breakpoint: &str, component: &str) -> bool {
        self.components
            .get_mut(breakpoint)
            .is_some_and(|configs| configs.remove(component).is_some())
    }

    pub fn component_config(&self, breakpoint: &str, component: &str) -> Option<&ComponentConfig> {
        self.components.get(breakpoint)?.get(component)
    }

    pub fn component_configs(&self, breakpoint: &str) -> Vec<&ComponentConfig> {
        self.components
            .get(breakpoint)
            .map(|configs| configs.values().collect())
            .unwrap_or_default()
    }

    /// Config for a component at the breakpoint covering `width`
    pub fn component_config_for_width(
        &self,
        width: u32,
        component: &str,
    ) -> Option<&ComponentConfig> {
        let breakpoint = self.breakpoint_for_width(width)?;
        self.component_config(&breakpoint.name, component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_breakpoints() {
        let registry = ResponsiveRegistry::new();
        let name = |w| registry.breakpoint_for_width(w).unwrap().name.clone();
        assert_eq!(name(320), "mobile");
        assert_eq!(name(767), "mobile");
        assert_eq!(name(768), "tablet");
        assert_eq!(name(1023), "tablet");
        assert_eq!(name(1024), "desktop");
        assert_eq!(name(4000), "desktop");
    }

    #[test]
    fn test_breakpoints_sorted() {
        let registry = ResponsiveRegistry::new();
        let names: Vec<&str> = registry.breakpoints().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["mobile", "tablet", "desktop"]);
    }

    #[test]
    fn test_update_and_remove_breakpoint() {
        let mut registry = ResponsiveRegistry::new();
        assert!(registry.update_breakpoint(Breakpoint::new("tablet", 600, Some(1023))));
        assert!(!registry.update_breakpoint(Breakpoint::new("watch", 0, Some(200))));
        assert_eq!(registry.breakpoint_for_width(700).unwrap().name, "tablet");

        registry.remove_breakpoint("desktop");
        assert!(registry.breakpoint_for_width(2000).is_none());
    }

    #[test]
    fn test_layouts() {
        let mut registry = ResponsiveRegistry::empty();
        let layout = Layout {
            name: "reader".into(),
            columns: 1,
            sidebar: false,
            font_scale: 1.2,
        };
        registry.add_layout(layout.clone());
        assert!(registry.update_layout(Layout {
            columns: 2,
            ..layout
        }));
        assert_eq!(registry.layout("reader").unwrap().columns, 2);
        assert_eq!(registry.layouts().len(), 1);
        assert!(registry.remove_layout("reader").is_some());
    }

    #[test]
    fn test_component_configs() {
        let mut registry = ResponsiveRegistry::new();
        registry.set_component_config(ComponentConfig {
            component: "library".into(),
            breakpoint: "mobile".into(),
            props: json!({"grid": false}),
        });
        registry.set_component_config(ComponentConfig {
            component: "library".into(),
            breakpoint: "mobile".into(),
            props: json!({"grid": true}),
        });

        let config = registry.component_config_for_width(375, "library").unwrap();
        assert_eq!(config.props, json!({"grid": true}));
        assert!(registry.component_config_for_width(1200, "library").is_none());
        assert_eq!(registry.component_configs("mobile").len(), 1);

        assert!(registry.remove_component_config("mobile", "library"));
        assert!(!registry.remove_component_config("mobile", "library"));
    }
}
