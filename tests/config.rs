use mask_refine::{ConfigValidator, PromptModelConfig, PromptModelVariant, RefineConfig};

#[test]
fn partial_refine_config_fills_defaults() {
    let config: RefineConfig = serde_json::from_str(
        r#"{
            "num_iter": 5,
            "pairwise": {
                "appearance": { "weight": 4.0, "spatial_scale": 30.0, "color_scale": 10.0 }
            }
        }"#,
    )
    .unwrap();

    assert_eq!(config.num_iter, 5);
    assert_eq!(config.gt_prob, 0.7);
    assert!(config.do_crf);
    assert_eq!(config.pairwise.smoothness.weight, 3.0);
    assert_eq!(config.pairwise.appearance.spatial_scale, 30.0);
    assert_eq!(config.size_limits.min_side, 50);
    assert!(config.validate().is_ok());
}

#[test]
fn invalid_values_fail_validation() {
    let config: RefineConfig = serde_json::from_str(r#"{ "gt_prob": 1.2 }"#).unwrap();
    assert!(config.validate().is_err());

    let config: RefineConfig =
        serde_json::from_str(r#"{ "size_limits": { "min_side": 600, "max_side": 500 } }"#)
            .unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn prompt_model_variant_names() {
    let config: PromptModelConfig =
        serde_json::from_str(r#"{ "variant": "vit_l", "checkpoint": "weights/sam_vit_l.pth" }"#)
            .unwrap();
    assert_eq!(config.variant, PromptModelVariant::VitL);

    let config: PromptModelConfig =
        serde_json::from_str(r#"{ "checkpoint": "weights/sam.pth" }"#).unwrap();
    assert_eq!(config.variant, PromptModelVariant::VitH);

    let config: PromptModelConfig =
        serde_json::from_str(r#"{ "variant": "default", "checkpoint": "weights/sam.pth" }"#)
            .unwrap();
    assert_eq!(config.variant, PromptModelVariant::VitH);
    assert_eq!(
        serde_json::to_string(&config.variant).unwrap(),
        r#""vit_h""#
    );

    assert!(serde_json::from_str::<PromptModelConfig>(r#"{ "variant": "vit_x", "checkpoint": "x" }"#).is_err());
}
