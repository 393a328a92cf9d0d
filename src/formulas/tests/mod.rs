mod variable_map;
