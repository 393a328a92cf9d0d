mod variable_map_tests {
    use crate::errors::FormulaError;
    use crate::formulas::{Formula, SharedVariableMap, Value, ValueType, VariableMap};
    use crate::operations::transformations::reindex;

    fn consistent(map: &VariableMap) -> bool {
        map.variables().all(|v| map.variable_index(v.name()) == Some(v.index()) && map.variable_name(v.index()) == Some(v.name()))
            && map.constants().all(|c| map.constant_index(c.name()) == Some(c.index()))
    }

    #[test]
    fn test_dense_allocation() {
        let mut map = VariableMap::new();
        assert_eq!(map.max_variable_index(), 0);
        assert_eq!(map.add_bool_variable("a"), Ok(1));
        assert_eq!(map.add_variable(Some("n"), None, ValueType::Integer), Ok(2));
        assert_eq!(map.add_variable(None, None, ValueType::Real), Ok(3));
        assert_eq!(map.variable_name(3), Some("3"));
        assert_eq!(map.variable(2).map(|v| v.value_type()), Some(ValueType::Integer));
        assert_eq!(map.variable_count(), 3);
        assert!(consistent(&map));
    }

    #[test]
    fn test_explicit_indices() {
        let mut map = VariableMap::new();
        assert_eq!(map.add_variable(Some("e"), Some(5), ValueType::Bool), Ok(5));
        assert_eq!(map.max_variable_index(), 5);
        assert_eq!(map.add_bool_variable("a"), Ok(1));
        assert_eq!(map.add_bool_variable("b"), Ok(2));
        assert_eq!(
            map.add_variable(Some("f"), Some(5), ValueType::Bool),
            Err(FormulaError::DuplicateIndex { index: 5, name: "e".to_owned() })
        );
        assert_eq!(map.add_variable(Some("zero"), Some(0), ValueType::Bool), Err(FormulaError::InvalidIndex(0)));
        assert_eq!(map.add_bool_variable("a"), Err(FormulaError::DuplicateName("a".to_owned())));
        assert!(map.add_variable(None, Some(2), ValueType::Bool).is_err());
        assert!(consistent(&map));
    }

    #[test]
    fn test_name_defaults_to_index() {
        let mut map = VariableMap::new();
        map.add_bool_variable("2").unwrap();
        assert_eq!(map.add_variable(None, None, ValueType::Bool), Ok(2));
        assert_eq!(map.variable_name(2), Some("2_1"));
        map.add_bool_variable("5").unwrap();
        map.add_bool_variable("5_1").unwrap();
        assert_eq!(map.add_variable(None, None, ValueType::Integer), Ok(5));
        assert_eq!(map.variable_name(5), Some("5_2"));
        assert_eq!(map.add_variable(None, Some(7), ValueType::Bool), Ok(7));
        assert_eq!(map.variable_name(7), Some("7"));
        assert_eq!(map.variable_count(), 6);
        assert!(consistent(&map));
    }

    #[test]
    fn test_large_explicit_index() {
        let mut map = VariableMap::new();
        let top = u32::try_from(i32::MAX).unwrap();
        assert_eq!(map.add_variable(Some("x"), Some(top), ValueType::Bool), Ok(top));
        assert_eq!(map.max_variable_index(), top);
        assert_eq!(map.add_bool_variable("a"), Ok(1));
        assert_eq!(map.add_variable(Some("m"), Some(1_000), ValueType::Bool), Ok(1_000));
        assert_eq!(map.add_bool_variable("b"), Ok(2));
        assert!(map.remove_variable(top));
        assert_eq!(map.max_variable_index(), 1_000);
        assert!(map.remove_variable(1_000));
        assert_eq!(map.max_variable_index(), 2);
        assert_eq!(map.add_bool_variable("c"), Ok(3));
        assert_eq!(map.add_variable(Some("y"), Some(top + 1), ValueType::Bool), Err(FormulaError::InvalidIndex(top + 1)));
        assert!(consistent(&map));
    }

    #[test]
    fn test_removal_frees_name_and_index() {
        let mut map = VariableMap::from_names(["a", "b", "c"]).unwrap();
        assert!(map.remove_variable_by_name("b"));
        assert!(!map.remove_variable_by_name("b"));
        assert!(!map.remove_variable(9));
        assert_eq!(map.variable_index("b"), None);
        assert!(!map.has_variable(2));
        assert_eq!(map.variable_index("c"), Some(3));
        assert_eq!(map.add_bool_variable("d"), Ok(2));
        assert!(map.remove_variable(3));
        assert_eq!(map.max_variable_index(), 2);
        assert_eq!(map.add_bool_variable("b"), Ok(3));
        assert_eq!(map.variable_names(), vec!["a", "d", "b"]);
        assert!(consistent(&map));
    }

    #[test]
    fn test_rename() {
        let mut map = VariableMap::from_names(["a", "b"]).unwrap();
        map.rename_variable("a", "root").unwrap();
        assert_eq!(map.variable_index("root"), Some(1));
        assert_eq!(map.variable_index("a"), None);
        assert_eq!(map.rename_variable("a", "x"), Err(FormulaError::UnknownVariable("a".to_owned())));
        assert_eq!(map.rename_variable("root", "b"), Err(FormulaError::DuplicateName("b".to_owned())));
        assert_eq!(map.rename_variable_at(2, "b"), Ok(()));
        assert!(map.rename_variable_at(7, "c").is_err());
        assert!(consistent(&map));
    }

    #[test]
    fn test_constants() {
        let mut map = VariableMap::from_names(["a"]).unwrap();
        let seven = map.add_constant(Some("seven"), None, Value::Integer(7)).unwrap();
        assert_eq!(seven, 1);
        assert_eq!(map.constant(seven).map(|c| c.value()), Some(Value::Integer(7)));
        assert_eq!(map.add_constant(Some("a"), None, Value::Bool(true)), Ok(2));
        assert_eq!(map.add_constant(Some("seven"), None, Value::Real(7.0)), Err(FormulaError::DuplicateName("seven".to_owned())));
        assert_eq!(map.constant_count(), 2);
        assert!(map.remove_constant_by_name("a"));
        assert_eq!(map.max_constant_index(), 1);
        assert_eq!(map.variable_count(), 1);
    }

    #[test]
    fn test_get_or_add_bool_and_literals() {
        let mut map = VariableMap::new();
        assert_eq!(map.get_or_add_bool("a"), Ok(1));
        assert_eq!(map.get_or_add_bool("a"), Ok(1));
        map.add_variable(Some("n"), None, ValueType::Integer).unwrap();
        assert!(matches!(map.get_or_add_bool("n"), Err(FormulaError::TypeMismatch { .. })));
        assert_eq!(map.literal("a", false).map(|l| l.value()), Ok(-1));
        assert!(matches!(map.literal("n", true), Err(FormulaError::TypeMismatch { .. })));
        assert_eq!(map.literal("b", true), Err(FormulaError::UnknownVariable("b".to_owned())));
    }

    #[test]
    fn test_normalize_and_reindex() {
        let mut map = VariableMap::from_names(["a", "b", "c", "d"]).unwrap();
        let formula = Formula::or(vec![Formula::var(2), Formula::lit(4, false)]);
        map.remove_variable(1);
        map.remove_variable(3);
        let normalization = map.normalize();
        assert_eq!(normalization.variables.iter().collect::<Vec<_>>(), vec![(2, 1), (4, 2)]);
        assert!(normalization.constants.is_empty());
        assert_eq!(map.variable_names(), vec!["b", "d"]);
        assert!(consistent(&map));
        let reindexed = reindex(&formula, &normalization).unwrap();
        assert_eq!(reindexed.to_string(&map), "b | ~d");
        assert!(map.normalize().variables.is_identity());
    }

    #[test]
    fn test_validate() {
        let mut map = VariableMap::from_names(["a"]).unwrap();
        assert_eq!(map.validate(&Formula::var(1)), Ok(()));
        assert!(matches!(map.validate(&Formula::var(2)), Err(FormulaError::UnknownVariable(_))));
        map.add_variable(Some("n"), None, ValueType::Integer).unwrap();
        assert!(matches!(map.validate(&Formula::lit(2, false)), Err(FormulaError::TypeMismatch { .. })));
    }

    #[test]
    fn test_shared_map() {
        let shared = SharedVariableMap::new(VariableMap::from_names(["a"]).unwrap());
        let clone = shared.clone();
        clone.write().add_bool_variable("b").unwrap();
        assert_eq!(shared.read().variable_count(), 2);
        let snapshot = shared.snapshot();
        shared.write().add_bool_variable("c").unwrap();
        assert_eq!(snapshot.variable_count(), 2);
        assert_eq!(clone.read().variable_index("c"), Some(3));
    }
}
