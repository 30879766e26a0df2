    use super::*;
    use switchyard_protocols::{
        ActionDefinition, DefinitionError, ModelDefinition, Route, SkillDefinition, Step,
    };

    fn populated() -> Registry {
        let registry = Registry::new();
        registry
            .register(
                ModelDefinition::new("image-to-video", "fal")
                    .with_provider("replicate")
                    .with_description("Animate a still image")
                    .with_types("image", "video"),
            )
            .unwrap();
        registry
            .register(
                ModelDefinition::new("text-to-image", "fal")
                    .with_description("Generate an image from a prompt")
                    .with_types("text", "image"),
            )
            .unwrap();
        registry
            .register(
                ActionDefinition::new("animate")
                    .with_description("Animate an image with the best video model")
                    .with_types("image", "video")
                    .with_route(Route::new("image-to-video")),
            )
            .unwrap();
        registry
            .register(
                SkillDefinition::new("storyboard")
                    .with_description("Prompt to animated clip")
                    .with_step(Step::new("frame", "text-to-image"))
                    .with_step(Step::new("clip", "animate")),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_register_and_resolve() {
        let registry = populated();
        let found = registry.resolve("animate").unwrap();
        assert_eq!(found.kind(), DefinitionKind::Action);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_register_rejects_invalid_definition() {
        let registry = Registry::new();
        let result = registry.register(ModelDefinition::new("", "fal"));
        assert!(matches!(
            result,
            Err(RegistryError::InvalidDefinition(DefinitionError::EmptyName))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_is_last_write_wins() {
        let registry = Registry::new();
        registry
            .register(ModelDefinition::new("flux", "fal").with_description("v1"))
            .unwrap();
        registry
            .register(ModelDefinition::new("flux", "fal").with_description("v2"))
            .unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve("flux").unwrap().description(), "v2");
    }

    #[test]
    fn test_resolution_order_across_kinds() {
        let registry = Registry::new();
        registry
            .register(SkillDefinition::new("upscale").with_step(Step::new("a", "x")))
            .unwrap();
        registry
            .register(ActionDefinition::new("upscale").with_route(Route::new("x")))
            .unwrap();
        assert_eq!(registry.resolve("upscale").unwrap().kind(), DefinitionKind::Action);

        registry.register(ModelDefinition::new("upscale", "fal")).unwrap();
        assert_eq!(registry.resolve("upscale").unwrap().kind(), DefinitionKind::Model);
    }

    #[test]
    fn test_resolve_with_kind_prefix() {
        let registry = Registry::new();
        registry.register(ModelDefinition::new("upscale", "fal")).unwrap();
        registry
            .register(SkillDefinition::new("upscale").with_step(Step::new("a", "x")))
            .unwrap();

        assert_eq!(
            registry.resolve("skill/upscale").unwrap().kind(),
            DefinitionKind::Skill
        );
        assert!(registry.resolve("action/upscale").is_none());
    }

    #[test]
    fn test_resolve_slash_name_without_kind_prefix() {
        let registry = Registry::new();
        registry.register(ModelDefinition::new("fal-ai/flux", "fal")).unwrap();
        assert!(registry.resolve("fal-ai/flux").is_some());
    }

    #[test]
    fn test_resolve_missing() {
        assert!(populated().resolve("nothing").is_none());
    }

    #[test]
    fn test_search_by_name_and_description() {
        let registry = populated();
        let names: Vec<String> = registry
            .search("IMAGE", &SearchFilters::default())
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names, vec!["image-to-video", "text-to-image", "animate"]);
    }

    #[test]
    fn test_search_filters_by_type() {
        let registry = populated();
        let filters = SearchFilters {
            output_type: Some("video".to_string()),
            ..Default::default()
        };
        let names: Vec<String> = registry
            .search("", &filters)
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names, vec!["image-to-video", "animate"]);
    }

    #[test]
    fn test_search_filters_by_provider_models_only() {
        let registry = populated();
        let filters = SearchFilters {
            provider: Some("replicate".to_string()),
            ..Default::default()
        };
        let found = registry.search("", &filters);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "image-to-video");
    }

    #[test]
    fn test_list_by_kind_and_all() {
        let registry = populated();
        let models: Vec<String> = registry
            .list(Some(DefinitionKind::Model))
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(models, vec!["image-to-video", "text-to-image"]);
        assert_eq!(registry.list(None).len(), 4);
    }

    #[test]
    fn test_names_in_resolution_order() {
        assert_eq!(
            populated().names(),
            vec!["image-to-video", "text-to-image", "animate", "storyboard"]
        );
    }

    #[test]
    fn test_unregister() {
        let registry = populated();
        let removed = registry.unregister("storyboard").unwrap();
        assert_eq!(removed.kind(), DefinitionKind::Skill);
        assert!(registry.resolve("storyboard").is_none());
        assert!(matches!(
            registry.unregister("storyboard"),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn test_unregister_with_kind_prefix_leaves_other_kinds() {
        let registry = Registry::new();
        registry.register(ModelDefinition::new("upscale", "fal")).unwrap();
        registry
            .register(ActionDefinition::new("upscale").with_route(Route::new("x")))
            .unwrap();

        registry.unregister("action/upscale").unwrap();
        assert_eq!(registry.resolve("upscale").unwrap().kind(), DefinitionKind::Model);
        assert!(registry.get(DefinitionKind::Action, "upscale").is_none());
    }

    #[test]
    fn test_unregister_missing_provider() {
        let registry = Registry::new();
        assert!(matches!(
            registry.unregister_provider("fal"),
            Err(RegistryError::ProviderNotFound(_))
        ));
    }

    #[test]
    fn test_register_all_counts() {
        let registry = Registry::new();
        let count = registry
            .register_all(vec![
                Definition::from(ModelDefinition::new("a", "fal")),
                Definition::from(ModelDefinition::new("b", "fal")),
            ])
            .unwrap();
        assert_eq!(count, 2);
    }
