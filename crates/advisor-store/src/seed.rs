// ── Seed Knowledge ──
//
// The curated entries every store starts with. Ids are stable slugs.

use advisor_core::{Category, KnowledgeEntry};
use chrono::Utc;

fn entry(
    id: &str,
    title: &str,
    content: &str,
    tags: &[&str],
    category: Category,
    related_files: &[&str],
) -> KnowledgeEntry {
    KnowledgeEntry {
        id: id.to_string(),
        title: title.to_string(),
        content: content.trim_start_matches('\n').to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        category,
        last_updated: Utc::now(),
        related_files: related_files.iter().map(|f| f.to_string()).collect(),
    }
}

const REACT_COMPONENT: &str = r#"
Recommended shape for a React function component:

```typescript
import React from 'react';

interface ComponentProps {
  title: string;
  children?: React.ReactNode;
  onAction?: () => void;
}

export function Component({ title, children, onAction }: ComponentProps) {
  return (
    <div className="component">
      <h2>{title}</h2>
      {children}
      {onAction && (
        <button onClick={onAction}>Action</button>
      )}
    </div>
  );
}
```

Key points:
- declare props with an interface
- use a function declaration
- type children as React.ReactNode
- keep handlers optional and guard them with &&
"#;

const AI_INTEGRATION: &str = r#"
Recommended way to wire an AI service into a React app:

```typescript
// 1. Keep the AI logic in a service class
export class AIService {
  async analyzeCode(code: string): Promise<AnalysisResult> {
    // call the model
  }
}

// 2. Expose it to components through a custom hook
export function useAIService() {
  const [isLoading, setIsLoading] = useState(false);
  const [error, setError] = useState<string | null>(null);

  const analyzeCode = useCallback(async (code: string) => {
    setIsLoading(true);
    try {
      return await aiService.analyzeCode(code);
    } catch (err) {
      setError(err.message);
    } finally {
      setIsLoading(false);
    }
  }, []);

  return { analyzeCode, isLoading, error };
}

// 3. Consume the hook from the component
function CodeAnalyzer() {
  const { analyzeCode, isLoading } = useAIService();
}
```
"#;

const TS_ERROR_HANDLING: &str = r#"
Type-safe error handling with a Result type:

```typescript
type Result<T, E = Error> =
  | { success: true; data: T }
  | { success: false; error: E };

async function safeApiCall<T>(fn: () => Promise<T>): Promise<Result<T>> {
  try {
    const data = await fn();
    return { success: true, data };
  } catch (error) {
    return {
      success: false,
      error: error instanceof Error ? error : new Error(String(error))
    };
  }
}

const result = await safeApiCall(() => aiService.analyzeCode(code));
if (result.success) {
  render(result.data);
} else {
  report(result.error.message);
}
```
"#;

const FRAMER_MOTION: &str = r#"
Smooth transitions for UI elements:

```typescript
import { motion, AnimatePresence } from 'framer-motion';

// fade in
<motion.div
  initial={{ opacity: 0, y: 20 }}
  animate={{ opacity: 1, y: 0 }}
  exit={{ opacity: 0, y: -20 }}
  transition={{ duration: 0.2 }}
>
  Content
</motion.div>

// slide-out panel
<motion.div
  initial={{ scale: 0, opacity: 0 }}
  animate={{ scale: 1, opacity: 1 }}
  exit={{ scale: 0, opacity: 0 }}
  transition={{ type: "spring", stiffness: 300, damping: 30 }}
  style={{ originX: 1, originY: 1 }}
>
  Panel Content
</motion.div>

// tab switch
<AnimatePresence mode="wait">
  <motion.div
    key={activeTab}
    initial={{ opacity: 0, x: 20 }}
    animate={{ opacity: 1, x: 0 }}
    exit={{ opacity: 0, x: -20 }}
    transition={{ duration: 0.2 }}
  >
    Tab Content
  </motion.div>
</AnimatePresence>
```
"#;

/// The four curated entries, in their canonical order.
pub fn seed_entries() -> Vec<KnowledgeEntry> {
    vec![
        entry(
            "react-component-pattern",
            "React function component best practices",
            REACT_COMPONENT,
            &["react", "typescript", "component", "pattern"],
            Category::Pattern,
            &["src/components/"],
        ),
        entry(
            "ai-integration-pattern",
            "AI service integration pattern",
            AI_INTEGRATION,
            &["ai", "react", "service", "hooks", "pattern"],
            Category::Pattern,
            &["src/services/aiService.ts", "src/hooks/ai/"],
        ),
        entry(
            "typescript-error-handling",
            "TypeScript error handling",
            TS_ERROR_HANDLING,
            &["typescript", "error-handling", "pattern"],
            Category::Solution,
            &[],
        ),
        entry(
            "framer-motion-animations",
            "Framer Motion animation patterns",
            FRAMER_MOTION,
            &["framer-motion", "animation", "ui", "react"],
            Category::Example,
            &["src/components/ai/AIPanel.tsx"],
        ),
    ]
}
