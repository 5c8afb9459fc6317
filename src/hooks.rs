//! Curated hook documentation catalog
//!
//! A fixed table of framework hooks (name, signature, parameters, return
//! type, usage example) seeded into the index at construction. The
//! catalog is deliberately not fed by the parser: hook usages found in
//! source do not extend it, so the documentation stays curated.

use crate::entities::HookDoc;

fn hook(
    name: &str,
    signature: &str,
    parameters: &[&str],
    return_type: &str,
    description: &str,
    example: &str,
) -> HookDoc {
    HookDoc {
        name: name.to_string(),
        signature: signature.to_string(),
        parameters: parameters.iter().map(|p| p.to_string()).collect(),
        return_type: return_type.to_string(),
        description: description.to_string(),
        example: example.to_string(),
    }
}

/// Build the seed catalog
pub fn catalog() -> Vec<HookDoc> {
    vec![
        hook(
            "useState",
            "useState<S>(initialState: S | (() => S)): [S, Dispatch<SetStateAction<S>>]",
            &["initialState"],
            "[S, Dispatch<SetStateAction<S>>]",
            "Returns a stateful value and a setter that schedules a re-render.",
            "const [count, setCount] = useState(0);",
        ),
        hook(
            "useEffect",
            "useEffect(effect: EffectCallback, deps?: DependencyList): void",
            &["effect", "deps"],
            "void",
            "Runs a side effect after render; re-runs when a dependency changes.",
            "useEffect(() => { document.title = title; }, [title]);",
        ),
        hook(
            "useMemo",
            "useMemo<T>(factory: () => T, deps: DependencyList): T",
            &["factory", "deps"],
            "T",
            "Memoizes an expensive computation across renders.",
            "const sorted = useMemo(() => items.sort(byName), [items]);",
        ),
        hook(
            "useCallback",
            "useCallback<T extends Function>(callback: T, deps: DependencyList): T",
            &["callback", "deps"],
            "T",
            "Returns a stable callback identity until a dependency changes.",
            "const onSave = useCallback(() => save(draft), [draft]);",
        ),
        hook(
            "useRef",
            "useRef<T>(initialValue: T): MutableRefObject<T>",
            &["initialValue"],
            "MutableRefObject<T>",
            "Holds a mutable value that survives renders without triggering them.",
            "const input = useRef<HTMLInputElement>(null);",
        ),
        hook(
            "useContext",
            "useContext<T>(context: Context<T>): T",
            &["context"],
            "T",
            "Reads the nearest provider value for a context.",
            "const theme = useContext(ThemeContext);",
        ),
        hook(
            "useReducer",
            "useReducer<R>(reducer: R, initialState: State): [State, Dispatch<Action>]",
            &["reducer", "initialState"],
            "[State, Dispatch<Action>]",
            "Local state managed through a reducer function.",
            "const [state, dispatch] = useReducer(reducer, initial);",
        ),
        hook(
            "useSelector",
            "useSelector<S, T>(selector: (state: S) => T): T",
            &["selector"],
            "T",
            "Selects a value from the store state and subscribes to changes.",
            "const todos = useSelector((state) => state.todos.items);",
        ),
        hook(
            "useDispatch",
            "useDispatch(): Dispatch",
            &[],
            "Dispatch",
            "Returns the store dispatch function.",
            "const dispatch = useDispatch();",
        ),
        hook(
            "useNavigate",
            "useNavigate(): NavigateFunction",
            &[],
            "NavigateFunction",
            "Returns a function for programmatic route navigation.",
            "const navigate = useNavigate(); navigate('/login');",
        ),
        hook(
            "useParams",
            "useParams<T>(): T",
            &[],
            "T",
            "Returns the `:param` values of the currently matched route.",
            "const { id } = useParams();",
        ),
    ]
}
